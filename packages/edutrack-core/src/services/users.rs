//! User rules: email uniqueness and the enrollment deletion guard.

use chrono::Utc;

use crate::error::{DbError, Result, Violation};
use crate::models::{Entity, NewUser, User, UserPatch};
use crate::store::Store;

/// Returns true if a user other than `except` already uses `email`.
fn email_taken(store: &Store, email: &str, except: Option<u64>) -> bool {
    store
        .users()
        .iter()
        .any(|user| user.email == email && Some(user.id) != except)
}

/// Creates a user.
///
/// # Errors
/// [`Violation::DuplicateEmail`] if any user already has `new.email`.
pub fn create(store: &mut Store, new: NewUser) -> Result<&User> {
    if email_taken(store, &new.email, None) {
        return Err(Violation::DuplicateEmail.into());
    }

    let id = store.users_mut().next_id();
    let user = store.users_mut().insert(
        id,
        User {
            id,
            name: new.name,
            email: new.email,
            is_active: new.is_active,
            created_at: Utc::now(),
        },
    );
    tracing::debug!(user_id = id, "Created user");
    Ok(user)
}

/// Gets a user by id.
pub fn get(store: &Store, id: u64) -> Result<&User> {
    store
        .users()
        .get(id)
        .ok_or_else(|| DbError::not_found(Entity::User, id))
}

/// Lists all users in insertion order.
pub fn list(store: &Store) -> Vec<&User> {
    store.users().iter().collect()
}

/// Applies the fields present in `patch`.
///
/// # Errors
/// - [`DbError::NotFound`] if the user does not exist
/// - [`Violation::DuplicateEmail`] if the new email belongs to another user
pub fn update(store: &mut Store, id: u64, patch: UserPatch) -> Result<&User> {
    if !store.users().contains(id) {
        return Err(DbError::not_found(Entity::User, id));
    }
    if let Some(email) = patch.email.as_deref() {
        if email_taken(store, email, Some(id)) {
            return Err(Violation::DuplicateEmail.into());
        }
    }

    let user = store
        .users_mut()
        .get_mut(id)
        .ok_or_else(|| DbError::not_found(Entity::User, id))?;
    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(is_active) = patch.is_active {
        user.is_active = is_active;
    }
    tracing::debug!(user_id = id, "Updated user");
    Ok(user)
}

/// Deletes a user that no enrollment references.
///
/// # Errors
/// - [`DbError::NotFound`] if the user does not exist
/// - [`DbError::Conflict`] if any enrollment references the user; the
///   store is left unchanged
pub fn delete(store: &mut Store, id: u64) -> Result<User> {
    if !store.users().contains(id) {
        return Err(DbError::not_found(Entity::User, id));
    }
    if store.enrollments().iter().any(|e| e.user_id == id) {
        return Err(DbError::conflict(Entity::User, id));
    }

    let user = store
        .users_mut()
        .remove(id)
        .ok_or_else(|| DbError::not_found(Entity::User, id))?;
    tracing::debug!(user_id = id, "Deleted user");
    Ok(user)
}

/// Marks a user inactive. Idempotent.
pub fn deactivate(store: &mut Store, id: u64) -> Result<&User> {
    let user = store
        .users_mut()
        .get_mut(id)
        .ok_or_else(|| DbError::not_found(Entity::User, id))?;
    user.is_active = false;
    tracing::debug!(user_id = id, "Deactivated user");
    Ok(user)
}

/// Returns true only for an existing, active user.
///
/// A missing user and an inactive one are indistinguishable here.
pub fn is_active(store: &Store, id: u64) -> bool {
    store.users().get(id).is_some_and(|user| user.is_active)
}
