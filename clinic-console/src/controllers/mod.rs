//! Entity view controllers.
//!
//! Doctors, patients and appointments share one controller shape: a list
//! view, an add form, an optional edit form and CRUD calls through the
//! [`Gateway`]. The per-entity parts (ids, texts, row rendering, form
//! fields) live in a [`CrudEntity`] impl; [`EntityController`] does the
//! orchestration. Bills follow a different flow and have their own
//! controller in [`bills`].
//!
//! Failed calls are already reported by the gateway. Mutating actions return
//! the error anyway so front ends can tell the outcome; list loads swallow it
//! and render an error row instead.

use std::marker::PhantomData;
use std::sync::Arc;

use error_common::{ConsoleError, Result};
use logger_redacted::{redacted_debug, redacted_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::document::{Document, TableRow};
use crate::form::{FormEvent, FormValidation};
use crate::gateway::{Gateway, RequestOptions};
use crate::notification::NotificationService;

pub mod appointments;
pub mod bills;
pub mod doctors;
pub mod patients;

pub use appointments::AppointmentController;
pub use bills::BillController;
pub use doctors::DoctorController;
pub use patients::PatientController;

/// Shared collaborators handed to every controller
#[derive(Clone)]
pub struct ConsoleContext {
    pub document: Arc<dyn Document>,
    pub gateway: Arc<Gateway>,
    pub notifier: Arc<NotificationService>,
}

impl ConsoleContext {
    pub fn new(
        document: Arc<dyn Document>,
        gateway: Arc<Gateway>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            document,
            gateway,
            notifier,
        }
    }

    /// Report a failure that happened before any request was sent.
    pub(crate) fn reject<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            redacted_warn!("Form rejected ({}): {}", err.error_type(), err);
            self.notifier.error(err.user_message());
        }
        result
    }
}

/// Element ids and user-facing texts of one entity view.
#[derive(Debug, Clone, Copy)]
pub struct EntityView {
    /// Singular, lowercase, used in log lines
    pub name: &'static str,
    pub endpoint: &'static str,
    pub table: &'static str,
    pub columns: usize,
    pub add_form: &'static str,
    pub edit_form: Option<&'static str>,
    pub empty_message: &'static str,
    pub error_message: &'static str,
    pub added: &'static str,
    pub deleted: &'static str,
    pub delete_prompt: &'static str,
}

impl EntityView {
    pub fn item_endpoint(&self, id: i64) -> String {
        format!("{}/{}", self.endpoint, id)
    }
}

/// A backend record the console can list, create and delete.
pub trait CrudEntity: DeserializeOwned + Send + Sync + 'static {
    /// Payload sent on create and update
    type Form: Serialize + FormValidation + Send + Sync;

    const VIEW: EntityView;

    fn to_row(&self) -> TableRow;

    /// Read and parse the add form's fields.
    fn read_add_form(document: &dyn Document) -> Result<Self::Form>;

    /// Reset the add form's fields to their initial values.
    fn clear_add_form(document: &dyn Document);
}

/// A record that can also be edited in place.
pub trait EditableEntity: CrudEntity {
    const UPDATED: &'static str;

    fn populate_edit_form(&self, document: &dyn Document);

    /// Read the hidden id field and the edited values.
    fn read_edit_form(document: &dyn Document) -> Result<(i64, Self::Form)>;
}

pub struct EntityController<E> {
    ctx: ConsoleContext,
    entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityController<E> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: CrudEntity> EntityController<E> {
    pub fn new(ctx: ConsoleContext) -> Self {
        Self {
            ctx,
            entity: PhantomData,
        }
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.ctx
    }

    fn document(&self) -> &dyn Document {
        self.ctx.document.as_ref()
    }

    /// Fetch the full collection and render it.
    pub async fn load(&self) {
        let view = E::VIEW;
        let rows = match self.ctx.gateway.fetch::<Vec<E>>(view.endpoint).await {
            Ok(items) if items.is_empty() => {
                vec![TableRow::placeholder(view.empty_message, view.columns)]
            }
            Ok(items) => items.iter().map(E::to_row).collect(),
            Err(err) => {
                redacted_debug!(
                    "{} list load failed (status {:?}, not found: {}): {}",
                    view.name,
                    err.status(),
                    err.is_not_found(),
                    err
                );
                vec![TableRow::placeholder(view.error_message, view.columns)]
            }
        };
        self.document().render_rows(view.table, rows);
    }

    pub fn show_add_form(&self) {
        let view = E::VIEW;
        self.document().set_hidden(view.add_form, false);
        if let Some(edit_form) = view.edit_form {
            self.document().set_hidden(edit_form, true);
        }
    }

    pub fn hide_add_form(&self) {
        self.document().set_hidden(E::VIEW.add_form, true);
        E::clear_add_form(self.document());
    }

    pub async fn add(&self, event: &mut FormEvent) -> Result<()> {
        event.prevent_default();
        let view = E::VIEW;

        let form = self
            .ctx
            .reject(E::read_add_form(self.document()).and_then(|form| {
                form.validate()?;
                Ok(form)
            }))?;
        let options = self.ctx.reject(RequestOptions::post().json(&form))?;

        self.ctx
            .gateway
            .send::<serde_json::Value>(view.endpoint, options)
            .await?;

        info!(entity = view.name, "Created");
        self.ctx.notifier.success(view.added);
        self.hide_add_form();
        self.load().await;
        Ok(())
    }

    /// Delete after confirmation. Declining is not an error.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let view = E::VIEW;
        if !self.document().confirm(view.delete_prompt) {
            debug!(entity = view.name, id, "Delete declined");
            return Ok(());
        }

        self.ctx
            .gateway
            .request(&view.item_endpoint(id), RequestOptions::delete())
            .await?;

        info!(entity = view.name, id, "Deleted");
        self.ctx.notifier.success(view.deleted);
        self.load().await;
        Ok(())
    }
}

impl<E: EditableEntity> EntityController<E> {
    fn edit_form(&self) -> Result<&'static str> {
        E::VIEW.edit_form.ok_or_else(|| {
            ConsoleError::Config(format!("{} view has no edit form", E::VIEW.name))
        })
    }

    /// Fetch one record and open it in the edit form.
    pub async fn show_edit_form(&self, id: i64) -> Result<()> {
        let view = E::VIEW;
        let edit_form = self.edit_form()?;
        let record: E = self.ctx.gateway.fetch(&view.item_endpoint(id)).await?;

        record.populate_edit_form(self.document());
        self.document().set_hidden(edit_form, false);
        self.document().set_hidden(view.add_form, true);
        self.document().scroll_into_view(edit_form);
        Ok(())
    }

    pub fn hide_edit_form(&self) {
        if let Some(edit_form) = E::VIEW.edit_form {
            self.document().set_hidden(edit_form, true);
        }
    }

    pub async fn update(&self, event: &mut FormEvent) -> Result<()> {
        event.prevent_default();
        let view = E::VIEW;

        let (id, form) = self
            .ctx
            .reject(E::read_edit_form(self.document()).and_then(|(id, form)| {
                form.validate()?;
                Ok((id, form))
            }))?;
        let options = self.ctx.reject(RequestOptions::put().json(&form))?;

        self.ctx
            .gateway
            .send::<serde_json::Value>(&view.item_endpoint(id), options)
            .await?;

        info!(entity = view.name, id, "Updated");
        self.ctx.notifier.success(E::UPDATED);
        self.hide_edit_form();
        self.load().await;
        Ok(())
    }
}
