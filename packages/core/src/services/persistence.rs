//! Persistence collaborator
//!
//! The editor calls [`SaveHandler::on_save`] synchronously after every
//! applied change, with the complete current document. Throttling, diffing
//! and the actual storage are the handler's business.

use crate::models::Resource;

pub trait SaveHandler: Send + Sync {
    fn on_save(&self, resource: &Resource);
}

impl<F> SaveHandler for F
where
    F: Fn(&Resource) + Send + Sync,
{
    fn on_save(&self, resource: &Resource) {
        self(resource)
    }
}
