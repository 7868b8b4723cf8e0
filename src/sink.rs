// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry collaborator seam.

use crate::mapper::Attribute;

/// Destination for normalized attribute triples.
///
/// Implemented by the downstream device registry. Both the snapshot and
/// the subscription path write through this trait, and the two may race
/// benignly during startup: implementations must accept triples in any
/// order and be idempotent under repeated identical triples
/// (last-write-wins).
pub trait AttributeSink: Send + Sync {
    /// Applies a batch of attribute triples.
    fn apply(&self, attributes: Vec<Attribute>);
}
