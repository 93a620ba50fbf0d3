use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use log::{debug, info, warn};

use crate::backend::LedgerStore;
use crate::frontend::account::Account;
use crate::frontend::console::{Command, Console, PromptKind, Response};

const SAVE_FAILED: &str = "Unexpected error occurred while saving transaction. Transaction may not have been saved.";

/// The read-eval-prompt loop over one account.
pub struct Session<S, R, W> {
    account: Account<S>,
    console: Console<R, W>
}

impl<S: LedgerStore, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(account: Account<S>, console: Console<R, W>) -> Session<S, R, W> {
        Session { account, console }
    }

    /// Runs until the user exits or input ends, then returns the output sink.
    /// An I/O error on the console ends the session early; the console is
    /// dropped on that path too.
    pub fn run(mut self) -> io::Result<W> {
        info!("session started");
        loop {
            let command = match self.console.read_command()? {
                Response::Input(command) => command,
                Response::Exit => break
            };
            let flow = match command {
                Command::Deposit => self.transact(PromptKind::Deposit)?,
                Command::Withdraw => self.transact(PromptKind::Withdraw)?,
                Command::Balance => self.show_balance()?
            };
            if flow.is_break() {
                break;
            }
        }
        info!("session finished");
        return self.console.close();
    }

    fn transact(&mut self, kind: PromptKind) -> io::Result<ControlFlow<()>> {
        let amount = match self.console.read_amount(kind)? {
            Response::Input(amount) => amount,
            Response::Exit => return Ok(ControlFlow::Break(()))
        };

        let text = amount.to_string();
        let saved = match kind {
            PromptKind::Deposit => self.account.deposit(amount),
            PromptKind::Withdraw => self.account.withdraw(amount),
            PromptKind::Menu => {
                return Err(io::Error::new(io::ErrorKind::Other, "the menu prompt cannot record a transaction"));
            }
        };
        if let Err(err) = saved {
            warn!("failed to record {:?} of {}: {}", kind, text, err);
            self.console.write_line(SAVE_FAILED)?;
        }
        return Ok(ControlFlow::Continue(()));
    }

    fn show_balance(&mut self) -> io::Result<ControlFlow<()>> {
        let balance = self.account.balance();
        debug!("balance recomputed as {:?}", balance);
        self.console.write_line(format!("The current balance is: {}", balance))?;
        return Ok(ControlFlow::Continue(()));
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use crate::backend::HtmlStore;
    use crate::frontend::{Account, Console, Session};

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn run(store: HtmlStore, input: &str) -> String {
        colored::control::set_override(false);
        let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let output = Session::new(Account::new(store), console).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    fn deposit_withdraw_balance(dir: TempDir) {
        let store = HtmlStore::new(dir.path().join("log.html"));
        let printed = run(store.clone(), "deposit\n100\nwithdraw\n30.5\nbalance\nexit\n");

        assert!(printed.contains("Please enter an amount to deposit: \n"));
        assert!(printed.contains("Please enter an amount to withdraw: \n"));
        assert!(printed.contains("The current balance is: $69.50\n"));
        assert!(printed.ends_with("Program shutting down. Thank you\n"));

        let doc = fs::read_to_string(store.path()).unwrap();
        assert!(doc.contains("<tr><td>100</td></tr>"));
        assert!(doc.contains("<tr><td>-30.5</td></tr>"));
    }

    #[rstest]
    fn balance_survives_sessions(dir: TempDir) {
        let store = HtmlStore::new(dir.path().join("log.html"));
        run(store.clone(), "deposit\n10\n");
        run(store.clone(), "withdraw\n15.25\n");

        let printed = run(store, "balance\n");
        assert!(printed.contains("The current balance is: -$5.25\n"));
    }

    #[rstest]
    fn fresh_ledger_balance_is_zero(dir: TempDir) {
        let printed = run(HtmlStore::new(dir.path().join("log.html")), "balance\nexit\n");
        assert!(printed.contains("The current balance is: $0.00\n"));
    }

    #[rstest]
    fn exit_inside_amount_prompt_records_nothing(dir: TempDir) {
        let store = HtmlStore::new(dir.path().join("log.html"));
        let printed = run(store.clone(), "deposit\nEXIT\nbalance\n");

        assert!(!printed.contains("The current balance is"));
        assert!(!store.path().exists());
    }

    #[rstest]
    fn invalid_amount_is_retried(dir: TempDir) {
        let store = HtmlStore::new(dir.path().join("log.html"));
        let printed = run(store, "deposit\n-20\n20.001\n20.01\nbalance\nexit\n");

        assert!(printed.contains("Invalid Input '-20'"));
        assert!(printed.contains("Invalid Input '20.001'"));
        assert!(printed.contains("The current balance is: $20.01\n"));
    }

    #[rstest]
    fn failed_save_is_reported_and_loop_continues(dir: TempDir) {
        let printed = run(HtmlStore::new(dir.path()), "deposit\n5\nbalance\nexit\n");

        assert!(printed.contains("Transaction may not have been saved."));
        assert!(printed.contains("The current balance is: $0.00\n"));
    }

    #[rstest]
    fn large_and_shorthand_amounts(dir: TempDir) {
        let store = HtmlStore::new(dir.path().join("log.html"));
        let printed = run(store.clone(), "deposit\n99999999999999999999999999999999\ndeposit\n.5\nwithdraw\n+5.\nbalance\n");

        assert!(!printed.contains("Invalid Input"));
        assert!(printed.contains("The current balance is: $99999999999999999999999999999995.50\n"));
        let doc = fs::read_to_string(store.path()).unwrap();
        assert!(doc.contains("<tr><td>0.5</td></tr>"));
        assert!(doc.contains("<tr><td>-5</td></tr>"));
    }

    #[rstest]
    fn corrupt_ledger_reads_as_zero(dir: TempDir) {
        let path = dir.path().join("log.html");
        fs::write(&path, "<table id=\"transactions\"><tbody><tr><td>oops</td></tr></tbody></table>").unwrap();

        let printed = run(HtmlStore::new(&path), "balance\n");
        assert!(printed.contains("The current balance is: $0.00\n"));
    }
}
