// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component signatures
//!
//! A signature is a fixed-width bit set over component type ids. Entities use
//! one to record which components they carry, systems use one to record which
//! components they require.

use crate::ecs::ComponentId;
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Maximum number of distinct component types a registry can hold
pub const MAX_COMPONENTS: usize = 32;

/// Bit set over component type ids
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u32);

impl Signature {
    /// The empty signature
    pub const EMPTY: Signature = Signature(0);

    /// Create an empty signature
    pub const fn new() -> Self {
        Signature(0)
    }

    /// Create a signature from raw bits
    pub const fn from_bits(bits: u32) -> Self {
        Signature(bits)
    }

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Set the bit for `id`
    #[inline]
    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1 << id.index();
    }

    /// Clear the bit for `id`
    #[inline]
    pub fn reset(&mut self, id: ComponentId) {
        self.0 &= !(1 << id.index());
    }

    /// Test the bit for `id`
    #[inline]
    pub fn test(self, id: ComponentId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// True when every bit of `required` is also set here
    ///
    /// This is the membership rule: an entity belongs to a system when
    /// `(entity & system) == system`.
    #[inline]
    pub fn contains(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Whether no bit is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of bits set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the component ids whose bit is set, lowest first
    pub fn iter(self) -> impl Iterator<Item = ComponentId> {
        (0..MAX_COMPONENTS)
            .filter(move |&i| self.0 & (1 << i) != 0)
            .map(|i| ComponentId::new(i as u8))
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl FromIterator<ComponentId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut signature = Signature::new();
        for id in iter {
            signature.set(id);
        }
        signature
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}
