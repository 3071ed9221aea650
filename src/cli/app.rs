use super::state_file::{load_store, save_store};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gadgetledger::{ContractConfig, GadgetContract, Invocation, OPERATIONS, Operation, Response};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gadget-ledger")]
#[command(about = "Run gadget registry invocations against a local ledger snapshot")]
pub struct App {
    /// JSON snapshot the ledger is loaded from and saved back to
    #[arg(long, global = true, default_value = "gadget_ledger_state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the initialize entry point
    Init,
    /// Invoke a named operation with positional arguments
    Invoke {
        function: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the invocation names the contract understands
    Operations,
}

impl App {
    /// Runs the selected command and returns the process exit code.
    pub async fn run(self) -> Result<i32> {
        let config = ContractConfig::from_env().context("load contract configuration")?;

        match self.command {
            Command::Operations => {
                for (name, _) in OPERATIONS {
                    println!("{}", name);
                }
                Ok(0)
            }
            Command::Init => {
                let store = Arc::new(load_store(&self.state).await?);
                let contract = GadgetContract::with_config(store, config);
                let response = contract.init(&Invocation::new("init", Vec::<String>::new())).await;
                Ok(report(&response))
            }
            Command::Invoke { function, args } => {
                let store = Arc::new(load_store(&self.state).await?);
                let contract = GadgetContract::with_config(Arc::clone(&store), config);
                let response = contract.invoke(&Invocation::new(function.as_str(), args)).await;

                let mutating = Operation::resolve(&function).is_ok_and(Operation::is_mutating);
                if response.is_success() && mutating {
                    save_store(&store, &self.state).await?;
                }
                Ok(report(&response))
            }
        }
    }
}

fn report(response: &Response) -> i32 {
    match response {
        Response::Success { payload } => {
            if !payload.is_empty() {
                println!("{}", String::from_utf8_lossy(payload));
            }
            0
        }
        Response::Failure { message } => {
            eprintln!("Error: {}", message);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gadgetledger::RecordStore;
    use tempfile::tempdir;

    fn app(state: &std::path::Path, argv: &[&str]) -> App {
        let state = state.to_string_lossy().to_string();
        let mut full = vec!["gadget-ledger", "--state", state.as_str()];
        full.extend_from_slice(argv);
        App::try_parse_from(full).unwrap()
    }

    #[tokio::test]
    async fn test_invoke_persists_mutations() {
        let dir = tempdir().unwrap();
        let state = dir.path().join("state.json");

        let code = app(&state, &["invoke", "createGadget", "m1", "Red", "4", "Alice"])
            .run()
            .await
            .unwrap();
        assert_eq!(code, 0);

        let store = load_store(&state).await.unwrap();
        assert!(!store.get("m1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_invoke_does_not_write_state() {
        let dir = tempdir().unwrap();
        let state = dir.path().join("state.json");

        let code = app(&state, &["invoke", "readGadget", "ghost"]).run().await.unwrap();
        assert_eq!(code, 1);
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn test_negative_make_is_passed_through() {
        let dir = tempdir().unwrap();
        let state = dir.path().join("state.json");

        let code = app(&state, &["invoke", "createGadget", "m1", "red", "-2", "bob"])
            .run()
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_parse_init() {
        let parsed = App::try_parse_from(["gadget-ledger", "init"]).unwrap();
        assert!(matches!(parsed.command, Command::Init));
        assert_eq!(parsed.state, PathBuf::from("gadget_ledger_state.json"));
    }
}
