//! Peer-to-peer vehicle marketplace backend.
//!
//! Hexagonal layout: `domain` holds the entities, services and ports,
//! `inbound` exposes the HTTP adapter, `outbound` implements persistence
//! against SQLite via Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
