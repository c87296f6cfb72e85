// SPDX-License-Identifier: GPL-3.0

//! The extrinsic construction and encoding pipeline.
//!
//! From chain metadata to wire bytes: detect the format version, populate
//! extension values ([`ExtensionBuilder`]), assemble the signing payload
//! ([`build_signing_payload`]), then encode ([`ExtrinsicEncoder`]) once an
//! external signer has produced the signature.

pub mod encoder;
pub mod era;
pub mod extensions;
pub mod payload;
pub mod signed;

pub use encoder::{DecodedExtrinsic, ExtrinsicBody, ExtrinsicEncoder};
pub use era::Era;
pub use extensions::{ExtensionBuilder, StandardExtensionParams};
pub use payload::{build_signing_payload, SIGNING_PAYLOAD_HASH_THRESHOLD};
pub use signed::{MultiAddress, SignatureType, SignedData};
