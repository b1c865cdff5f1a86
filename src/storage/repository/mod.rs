// SPDX-License-Identifier: AGPL-3.0-or-later

//! Typed repositories over the document store.

pub mod properties;
pub mod users;

pub use properties::{PropertyFilter, PropertyRecord, PropertyRepository};
pub use users::{UserRecord, UserRepository};
