use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::backend::file_io::write_atomic;
use crate::backend::html::{self, TableRegion};
use crate::backend::interface::{BackendError, LedgerStore, Result};
use crate::core::Amount;

/// Keeps the ledger as rows of an HTML table, one `<tr><td>` per
/// transaction, so the file can be opened in a browser or edited by hand.
///
/// Every append reads and rewrites the whole document. Anything outside the
/// inserted row is written back byte for byte.
#[derive(Debug, Clone)]
pub struct HtmlStore {
    path: PathBuf,
    table_id: String
}

impl HtmlStore {
    pub const DEFAULT_TABLE_ID: &'static str = "transactions";

    pub fn new(path: impl AsRef<Path>) -> HtmlStore {
        HtmlStore {
            path: path.as_ref().to_owned(),
            table_id: Self::DEFAULT_TABLE_ID.to_owned()
        }
    }

    pub fn with_table_id(mut self, table_id: &str) -> HtmlStore {
        self.table_id = table_id.to_owned();
        return self;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist yet.
    fn read_document(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(doc) => Ok(Some(doc)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source))
        }
    }

    fn empty_document(&self) -> String {
        format!(concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "  <head>\n",
            "    <meta charset=\"utf-8\">\n",
            "    <title>Transactions</title>\n",
            "  </head>\n",
            "  <body>\n",
            "    <table id=\"{}\">\n",
            "      <tbody>\n",
            "      </tbody>\n",
            "    </table>\n",
            "  </body>\n",
            "</html>\n"), self.table_id)
    }

    fn locate<'a>(&self, doc: &'a str) -> Result<(Vec<html::Spanned<'a>>, TableRegion)> {
        let tokens = html::tokenize(doc);
        let region = html::locate_table(&tokens, &self.table_id)
            .ok_or_else(|| BackendError::MissingTable {
                path: self.path.clone(),
                id: self.table_id.clone()
            })?;
        return Ok((tokens, region));
    }

    fn io_error(&self, source: io::Error) -> BackendError {
        BackendError::Io { path: self.path.clone(), source }
    }
}

/// Leading whitespace of the line holding `offset`, if nothing else precedes it.
fn line_indent(doc: &str, offset: usize) -> Option<&str> {
    let line_start = doc[..offset].rfind('\n').map_or(0, |newline| newline + 1);
    let prefix = &doc[line_start..offset];
    if prefix.chars().all(char::is_whitespace) { Some(prefix) } else { None }
}

fn insert_row(doc: &str, region: &TableRegion, amount: &Amount) -> String {
    let row = format!("<tr><td>{}</td></tr>", amount);
    let (offset, markup) = match region.body_close_offset {
        Some(offset) => (offset, row),
        None => (region.close_offset, format!("<tbody>{}</tbody>", row))
    };

    let mut updated = String::with_capacity(doc.len() + 2 * markup.len());
    updated.push_str(&doc[..offset]);
    updated.push_str(&markup);
    // keep the closing tag on its own line, as it was
    if let Some(indent) = line_indent(doc, offset) {
        updated.push('\n');
        updated.push_str(indent);
    }
    updated.push_str(&doc[offset..]);
    return updated;
}

impl LedgerStore for HtmlStore {
    fn load(&self) -> Result<Vec<Amount>> {
        let Some(doc) = self.read_document()? else {
            debug!("{} does not exist yet, ledger is empty", self.path.display());
            return Ok(Vec::new());
        };

        let (tokens, region) = self.locate(&doc)?;
        html::cells(&tokens, &region).iter()
            .enumerate()
            .map(|(index, text)| Amount::from_cell(text).map_err(|source| BackendError::InvalidCell {
                path: self.path.clone(),
                row: index + 1,
                source
            }))
            .collect()
    }

    fn append(&self, amount: Amount) -> Result<()> {
        let doc = match self.read_document()? {
            Some(doc) => doc,
            None => {
                info!("creating ledger document {}", self.path.display());
                self.empty_document()
            }
        };

        let (_, region) = self.locate(&doc)?;
        let updated = insert_row(&doc, &region, &amount);
        write_atomic(&self.path, &updated).map_err(|err| self.io_error(err))?;

        debug!("appended {} to {}", amount, self.path.display());
        return Ok(());
    }
}
