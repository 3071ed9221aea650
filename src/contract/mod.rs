//! Invocation dispatcher for the gadget registry.
//!
//! [`GadgetContract::invoke`] resolves the invocation name against the fixed
//! [`Operation`] table, runs the operation against the [`RecordStore`], and
//! folds every outcome into a [`Response`].

pub mod args;
pub mod config;
pub mod invocation;
pub mod operation;

pub use args::Arguments;
pub use config::ContractConfig;
pub use invocation::{Invocation, Response};
pub use operation::{OPERATIONS, Operation};

use crate::core::{Gadget, LedgerError, Result};
use crate::query::CursorDrain;
use crate::store::RecordStore;
use tracing::{Instrument, Level, event, info_span};

pub struct GadgetContract<S> {
    store: S,
    config: ContractConfig,
}

impl<S: RecordStore> GadgetContract<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ContractConfig::default())
    }

    pub fn with_config(store: S, config: ContractConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Initialize entry point. Touches nothing and always succeeds.
    pub async fn init(&self, invocation: &Invocation) -> Response {
        event!(
            Level::INFO,
            tx_id = %invocation.tx_id,
            function = %invocation.function,
            args = ?invocation.args,
            "gadget contract instantiated"
        );
        Response::empty()
    }

    /// Invoke entry point.
    pub async fn invoke(&self, invocation: &Invocation) -> Response {
        let span = info_span!(
            "contract.invoke",
            tx_id = %invocation.tx_id,
            function = %invocation.function
        );

        async {
            let operation = match Operation::resolve(&invocation.function) {
                Ok(operation) => operation,
                Err(err) => {
                    event!(Level::ERROR, error = %err, "unknown invocation name");
                    return Response::failure(err.to_string());
                }
            };

            event!(Level::INFO, args = ?invocation.args, "calling method");
            let outcome = self.execute(operation, &invocation.args).await;
            if let Err(err) = &outcome {
                event!(Level::ERROR, kind = err.kind(), error = %err, "invocation failed");
            } else {
                event!(Level::DEBUG, "invocation succeeded");
            }
            Response::from(outcome)
        }
        .instrument(span)
        .await
    }

    /// Runs one operation, returning its payload if it produces one.
    pub async fn execute(&self, operation: Operation, args: &[String]) -> Result<Option<Vec<u8>>> {
        let args = Arguments::new(args);
        match operation {
            Operation::CreateGadget => self.create_gadget(args).await.map(|()| None),
            Operation::ReadGadget => self.read_gadget(args).await.map(Some),
            Operation::GetGadgetByRange => self.get_gadget_by_range(args).await.map(Some),
            Operation::ChangeGadget => self.change_gadget(args).await.map(|()| None),
            Operation::Delete => self.delete(args).await.map(|()| None),
        }
    }

    async fn create_gadget(&self, args: Arguments<'_>) -> Result<()> {
        let args = args.expect_exactly(4, "Incorrect number of arguments. Expecting 4")?;
        let model = args.get(0)?;
        let make = args.integer(2, "gadgetMake must be a numeric string")?;
        let gadget = Gadget::new(
            self.config.doc_type.as_str(),
            model,
            args.get(1)?,
            make,
            args.get(3)?,
        );

        let existing = self.store.get(model).await?;
        if !existing.is_empty() {
            return Err(LedgerError::Conflict(model.to_string()));
        }

        self.store.put(model, gadget.encode()?).await?;
        event!(Level::INFO, model = %model, "gadget created");
        Ok(())
    }

    async fn read_gadget(&self, args: Arguments<'_>) -> Result<Vec<u8>> {
        let args = args.expect_exactly(
            1,
            "Incorrect number of arguments. Expecting name of the gadget to query",
        )?;
        let model = args.non_empty(0, "gadget name must not be empty")?;

        let stored = self.store.get(model).await?;
        if stored.is_empty() {
            return Err(LedgerError::NotFound(format!("Gadget does not exist: {}", model)));
        }
        Ok(stored)
    }

    async fn get_gadget_by_range(&self, args: Arguments<'_>) -> Result<Vec<u8>> {
        let args = args.expect_at_least(2, "Incorrect number of arguments. Expecting 2")?;
        let start_key = args.get(0)?;
        let end_key = args.get(1)?;

        if self.config.reject_inverted_range && !end_key.is_empty() && start_key > end_key {
            return Err(LedgerError::argument(format!(
                "startKey '{}' sorts after endKey '{}'",
                start_key, end_key
            )));
        }

        let cursor = self.store.range_scan(start_key, end_key).await?;
        let entries = CursorDrain::new(cursor, self.config.doc_type.as_str())
            .with_limit(self.config.max_range_results)
            .drain()
            .await?;

        event!(Level::INFO, start_key = %start_key, end_key = %end_key, returned = entries.len(), "range query drained");
        Ok(serde_json::to_vec(&entries)?)
    }

    async fn change_gadget(&self, args: Arguments<'_>) -> Result<()> {
        let args = args.expect_at_least(2, "Incorrect number of arguments. Expecting 2")?;
        let model = args.get(0)?;
        let new_owner = args.get(1)?;

        let stored = self.store.get(model).await?;
        if stored.is_empty() {
            return Err(LedgerError::NotFound("gadget does not exist".to_string()));
        }

        let (gadget, rewritten) =
            Gadget::transfer_stored(&stored, &self.config.doc_type, new_owner).map_err(|err| {
                event!(Level::WARN, model = %model, error = %err, "stored gadget is not decodable");
                LedgerError::Decode(model.to_string())
            })?;

        self.store.put(model, rewritten).await?;
        event!(Level::INFO, model = %model, owner = %gadget.owner, "gadget transferred");
        Ok(())
    }

    async fn delete(&self, args: Arguments<'_>) -> Result<()> {
        let args = args.expect_exactly(1, "Incorrect number of arguments. Expecting 1")?;
        let model = args.get(0)?;

        self.store.delete(model).await?;
        event!(Level::INFO, model = %model, "gadget deleted");
        Ok(())
    }
}
