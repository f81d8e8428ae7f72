use crate::engine::{Command, CommandError, Operation};
use crate::models::TransactionError;
use crate::service::TransactionService;
use crate::types::TransactionId;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error, info, warn};

/// Outcome counts for a single run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct EngineReport {
    pub applied: usize,
    pub rejected: usize
}

/// Replays a CSV stream of create/get/update/delete commands against the service.
///
/// Rows are decoded on a blocking task and applied strictly in file order, so an
/// update always sees the create that precedes it. A row that cannot be decoded
/// counts as rejected.
pub struct CommandEngine {
    service: Arc<TransactionService>,
    backpressure: usize
}

impl CommandEngine {
    pub fn new(service: Arc<TransactionService>) -> Self {
        Self {
            service,
            backpressure: 256
        }
    }

    /// Bounds the number of decoded rows waiting to be applied.
    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Runs every command in the file at `path`.
    ///
    /// A missing file is logged and yields an empty report rather than failing
    /// the run.
    pub async fn run(&self, path: &str) -> anyhow::Result<EngineReport> {
        let (sender, receiver) = mpsc::channel::<csv::Result<Command>>(self.backpressure);
        let csv_handle = self.spawn_csv_reader(path.to_string(), sender);
        let report = self.process_commands(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        info!("Applied [{}] commands, rejected [{}]", report.applied, report.rejected);

        Ok(report)
    }

    /// Applies a single command through the service.
    pub fn apply(&self, command: &Command) -> Result<(), CommandError> {
        match command.operation {
            Operation::Create => {
                self.service.create(command.to_request())?;
            },
            Operation::Get => {
                let transaction_id = target(command)?;
                let transaction = self.service.get(transaction_id)
                    .ok_or(TransactionError::not_found(transaction_id))?;
                debug!("Transaction [{}]:[{}] read with amount [{}]", transaction.id, transaction.transaction_type, transaction.amount);
            },
            Operation::Update => {
                let transaction_id = target(command)?;
                self.service.update(transaction_id, command.to_request())?;
            },
            Operation::Delete => {
                let transaction_id = target(command)?;
                self.service.delete(transaction_id)?;
            }
        }

        Ok(())
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<csv::Result<Command>>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening CSV at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<Command>() {
                if sender.blocking_send(result).is_err() {
                    break;
                }
            }
        })
    }

    async fn process_commands(&self, mut receiver: mpsc::Receiver<csv::Result<Command>>) -> EngineReport {
        let mut report = EngineReport::default();

        while let Some(result) = receiver.recv().await {
            let command = match result {
                Ok(command) => command,
                Err(error) => {
                    error!("CSV deserialization error: {error}");
                    report.rejected += 1;
                    continue;
                }
            };

            match self.apply(&command) {
                Ok(_) => {
                    debug!("Command [{:?}] for transaction [{:?}] applied", command.operation, command.id);
                    report.applied += 1;
                },
                Err(error) => {
                    warn!("Command [{:?}] for transaction [{:?}] rejected: {error}", command.operation, command.id);
                    report.rejected += 1;
                }
            }
        }

        report
    }
}

fn target(command: &Command) -> Result<TransactionId, CommandError> {
    command.id.ok_or(CommandError::MissingId { operation: command.operation })
}
