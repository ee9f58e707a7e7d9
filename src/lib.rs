//! Route Origin Authorizations.
//!
//! A _Route Origin Authorization_ (ROA) is an RPKI signed object in which
//! the holder of IP address prefixes authorizes an autonomous system to
//! originate routes for them. Relying parties use ROAs to validate the
//! origin of route announcements in BGP.
//!
//! This crate builds ROAs from a simple textual configuration, signs them,
//! and reads and writes them as DER or as armored text. The central type is
//! [`RoaObject`][roa::RoaObject]. The [`format`] module provides
//! [`load`][format::load] and [`store`][format::store] which tie everything
//! together.
//!
//! The crate does not validate certificate chains and does not deal with
//! trust anchors or the distribution of ROAs.
//!
//! # Features
//!
//! * `ranges`: accept address ranges in configuration files via the
//!   `ipaddrmin` and `ipaddrmax` keys,
//! * `serde`: serialize ROAs as Base 64 encoded DER,
//! * `tools`: build the `readroa` and `mkroa` binaries.

pub mod armor;
pub mod builder;
pub mod cert;
pub mod conf;
pub mod crypto;
pub mod error;
pub mod format;
pub mod oid;
pub mod prefix;
pub mod roa;
pub mod sigobj;
pub mod validate;

pub mod util {
    pub mod base64;
    pub mod der;
    pub mod hex;
}

pub use self::error::RoaError;
pub use self::format::{load, store, Format};
pub use self::roa::RoaObject;
