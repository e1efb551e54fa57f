//! Multipart form payloads for POST requests.

use std::fmt;
use std::path::Path;

use curl::easy::Form;

use crate::error::Error;

/// Builder for `multipart/form-data` request bodies.
///
/// Content parts are copied into the form when added; file parts are read by
/// the engine at transfer time. Consumed by
/// [`Connection::post_form`](crate::Connection::post_form) and
/// [`post_form`](crate::post_form).
///
/// # Example
///
/// ```no_run
/// use restclient::FormData;
///
/// # fn main() -> Result<(), restclient::Error> {
/// let mut form = FormData::new();
/// form.add_content("submitter", "maintainer")?;
/// form.add_file("attachment", "data/report.pdf")?;
/// # Ok(())
/// # }
/// ```
pub struct FormData {
    form: Form,
    part_names: Vec<String>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: Form::new(),
            part_names: Vec::new(),
        }
    }

    /// Adds a named content field with an inline value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Form`] when the engine rejects the part.
    pub fn add_content(&mut self, field: &str, value: impl AsRef<[u8]>) -> Result<(), Error> {
        self.form.part(field).contents(value.as_ref()).add()?;
        self.part_names.push(field.to_string());
        Ok(())
    }

    /// Adds a named file field; the file is opened and read during the
    /// transfer, not when the part is added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Form`] when the engine rejects the part.
    pub fn add_file(&mut self, field: &str, path: impl AsRef<Path>) -> Result<(), Error> {
        self.form.part(field).file(path.as_ref()).add()?;
        self.part_names.push(field.to_string());
        Ok(())
    }

    /// Names of the fields added so far, in insertion order.
    #[must_use]
    pub fn part_names(&self) -> &[String] {
        &self.part_names
    }

    pub(crate) fn into_form(self) -> Form {
        self.form
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormData")
            .field("parts", &self.part_names)
            .finish_non_exhaustive()
    }
}
