// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay scripts against an instrumented in-memory store

pub mod script;

use crate::error::ReplayError;
use crate::output::{Outcome, Report, ReplyEntry};
use kvt_adapters::{
    instrument, instrument_cluster, BatchReply, ClusterBatch, Instrumented, InstrumentedCluster,
    MemoryBatch, MemoryCluster, MemoryClusterBatch, MemorySpan, MemoryStore, MemoryTracer, Span,
    StoreClient, Traced, TracedBatch, Tracer,
};
use kvt_core::{classify, Category, ScriptRegistry, StoreError, Value};
use script::{Directive, Line};
use std::collections::HashMap;

/// The instrumented client a script runs against
pub enum Target {
    Standalone(Instrumented<MemoryTracer, MemoryStore>),
    Cluster(InstrumentedCluster<MemoryTracer, MemoryCluster>),
}

impl Target {
    pub fn standalone(tracer: MemoryTracer) -> Self {
        Target::Standalone(instrument(tracer, MemoryStore::new()))
    }

    pub fn cluster(tracer: MemoryTracer, nodes: usize) -> Self {
        Target::Cluster(instrument_cluster(tracer, MemoryCluster::new(nodes)))
    }

    pub fn scripts(&self) -> &ScriptRegistry {
        match self {
            Target::Standalone(client) => client.scripts(),
            Target::Cluster(client) => client.scripts(),
        }
    }

    async fn traced(
        &self,
        context: Option<&MemorySpan>,
        name: &str,
        args: &[Value],
    ) -> Result<Traced<OpenBatch>, StoreError> {
        Ok(match self {
            Target::Standalone(client) => match client.traced(context, name, args).await? {
                Traced::Reply(value) => Traced::Reply(value),
                Traced::Batch(batch) => Traced::Batch(OpenBatch::Standalone(batch)),
            },
            Target::Cluster(client) => match client.traced(context, name, args).await? {
                Traced::Reply(value) => Traced::Reply(value),
                Traced::Batch(batch) => Traced::Batch(OpenBatch::Cluster(batch)),
            },
        })
    }

    async fn direct(&self, name: &str, args: &[Value]) -> Result<Value, StoreError> {
        match self {
            Target::Standalone(client) => client.client().command(name, args).await,
            Target::Cluster(client) => client.client().command(name, args).await,
        }
    }
}

enum OpenBatch {
    Standalone(TracedBatch<MemorySpan, MemoryBatch>),
    Cluster(ClusterBatch<MemorySpan, MemoryClusterBatch>),
}

impl OpenBatch {
    fn queue(&mut self, name: &str, args: Vec<Value>) -> Result<(), StoreError> {
        match self {
            OpenBatch::Standalone(batch) => batch.queue(name, args),
            OpenBatch::Cluster(batch) => batch.queue(name, args),
        }
    }

    async fn exec(self) -> Result<Vec<BatchReply>, StoreError> {
        match self {
            OpenBatch::Standalone(batch) => batch.exec().await,
            OpenBatch::Cluster(batch) => batch.exec().await,
        }
    }
}

/// A batch being filled, with the line that opened it
struct Pending {
    opened: usize,
    batch: OpenBatch,
}

/// Runs parsed scripts and collects replies
pub struct Replayer {
    tracer: MemoryTracer,
    target: Target,
    spans: HashMap<String, MemorySpan>,
    replies: Vec<ReplyEntry>,
}

impl Replayer {
    pub fn new(tracer: MemoryTracer, target: Target) -> Self {
        Self {
            tracer,
            target,
            spans: HashMap::new(),
            replies: Vec::new(),
        }
    }

    /// Run every line in order, then report replies and spans
    pub async fn run(mut self, lines: Vec<Line>) -> Result<Report, ReplayError> {
        let mut pending: Option<Pending> = None;

        for line in lines {
            let number = line.number;
            pending = match pending {
                Some(open) => self.step_in_batch(open, line).await?,
                None => self.step(line).await?,
            };
            tracing::trace!(line = number, batch_open = pending.is_some(), "replayed line");
        }

        if let Some(open) = pending {
            return Err(ReplayError::UnterminatedPipeline { line: open.opened });
        }

        Ok(Report {
            replies: self.replies,
            spans: self.tracer.spans(),
        })
    }

    /// Run one line outside a batch; returns a batch if the line opened one
    async fn step(&mut self, line: Line) -> Result<Option<Pending>, ReplayError> {
        let number = line.number;
        match line.directive {
            Directive::Define { name, keys } => {
                tracing::debug!(script = %name, %keys, "defining script");
                self.target.scripts().define(name, keys);
            }
            Directive::Span { label, parent } => self.open_span(number, label, parent)?,
            Directive::Finish { label } => self.finish_span(number, &label)?,
            Directive::Call {
                context,
                name,
                args,
            } => {
                let context = self.context(number, context.as_deref())?;
                match self.target.traced(context, &name, &args).await {
                    Ok(Traced::Batch(batch)) => {
                        return Ok(Some(Pending {
                            opened: number,
                            batch,
                        }));
                    }
                    Ok(Traced::Reply(value)) => self.reply(number, &name, Ok(value)),
                    Err(e) => self.reply(number, &name, Err(e)),
                }
            }
            Directive::Direct { name, args } => {
                let result = self.target.direct(&name, &args).await;
                self.reply(number, &name, result);
            }
            Directive::Exec => return Err(ReplayError::ExecWithoutPipeline { line: number }),
        }
        Ok(None)
    }

    /// Run one line while a batch is open
    async fn step_in_batch(
        &mut self,
        mut open: Pending,
        line: Line,
    ) -> Result<Option<Pending>, ReplayError> {
        let number = line.number;
        match line.directive {
            Directive::Exec => {
                let result = open.batch.exec().await;
                self.batch_replies(number, result);
                Ok(None)
            }
            Directive::Call {
                context: None,
                name,
                args,
            } => {
                if classify(&name, self.target.scripts()).category == Category::BatchControl {
                    return Err(ReplayError::NestedPipeline {
                        line: number,
                        opened: open.opened,
                    });
                }
                if let Err(e) = open.batch.queue(&name, args) {
                    self.reply(number, &name, Err(e));
                }
                Ok(Some(open))
            }
            directive @ (Directive::Define { .. }
            | Directive::Span { .. }
            | Directive::Finish { .. }) => {
                self.step(Line {
                    number,
                    directive,
                })
                .await?;
                Ok(Some(open))
            }
            other => Err(ReplayError::NotInPipeline {
                line: number,
                directive: match other {
                    Directive::Call { .. } => "@label",
                    _ => other.keyword(),
                },
            }),
        }
    }

    fn context(&self, line: usize, label: Option<&str>) -> Result<Option<&MemorySpan>, ReplayError> {
        label
            .map(|label| {
                self.spans.get(label).ok_or_else(|| ReplayError::UnknownSpan {
                    line,
                    label: label.to_string(),
                })
            })
            .transpose()
    }

    fn open_span(
        &mut self,
        line: usize,
        label: String,
        parent: Option<String>,
    ) -> Result<(), ReplayError> {
        if self.spans.contains_key(&label) {
            return Err(ReplayError::DuplicateSpan { line, label });
        }
        let parent = self.context(line, parent.as_deref())?;
        let span = self
            .tracer
            .start_span(&label, parent)
            .map_err(|source| ReplayError::Tracer { line, source })?;
        self.spans.insert(label, span);
        Ok(())
    }

    fn finish_span(&self, line: usize, label: &str) -> Result<(), ReplayError> {
        let span = self.spans.get(label).ok_or_else(|| ReplayError::UnknownSpan {
            line,
            label: label.to_string(),
        })?;
        span.finish()
            .map_err(|source| ReplayError::Tracer { line, source })
    }

    fn reply(&mut self, line: usize, command: &str, result: Result<Value, StoreError>) {
        self.replies.push(ReplyEntry {
            line,
            command: command.to_string(),
            outcome: Outcome::from(result),
        });
    }

    fn batch_replies(&mut self, line: usize, result: Result<Vec<BatchReply>, StoreError>) {
        match result {
            Ok(replies) => {
                for reply in replies {
                    self.reply(line, "exec", reply);
                }
            }
            Err(e) => self.reply(line, "exec", Err(e)),
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
