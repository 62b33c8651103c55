use uuid::Uuid;

use super::AuthError;
use crate::database::{Document, Repository};

/// A persisted record that belongs to exactly one identity
pub trait OwnedResource: Document {
    fn owner_id(&self) -> Uuid;
}

/// Loads a resource and admits only its owner.
///
/// A missing resource is reported as not found before ownership is compared, so
/// callers can tell "does not exist" (404) from "not yours" (403).
pub struct OwnershipGate<T> {
    resources: Repository<T>,
}

impl<T> Clone for OwnershipGate<T> {
    fn clone(&self) -> Self {
        Self {
            resources: self.resources.clone(),
        }
    }
}

impl<T: OwnedResource> OwnershipGate<T> {
    pub fn new(resources: Repository<T>) -> Self {
        Self { resources }
    }

    /// Returns the loaded resource so the handler need not fetch it again.
    pub async fn authorize(&self, raw_id: &str, identity_id: Uuid) -> Result<T, AuthError> {
        let id = Uuid::parse_str(raw_id).map_err(|_| AuthError::InvalidIdentifier(T::KIND))?;

        let resource = self
            .resources
            .find_by_id(id)
            .await?
            .ok_or(AuthError::ResourceNotFound(T::KIND))?;

        if resource.owner_id() != identity_id {
            tracing::warn!("Identity {} denied access to {} {}", identity_id, T::KIND, id);
            return Err(AuthError::Forbidden(T::KIND));
        }

        Ok(resource)
    }
}
