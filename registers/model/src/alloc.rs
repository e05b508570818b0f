// Licensed under the Apache-2.0 license

//! Address and bit-offset allocation.
//!
//! Both allocators are deterministic first-fit passes over declaration
//! order: fixed positions are claimed first, then every unfixed item takes
//! the lowest free position that fits. Items are never reordered or sorted
//! by size, and a position is never revisited once assigned.

use crate::error::{Entity, Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Register addresses are aligned to this many bytes.
pub const WORD_BYTES: u64 = 4;

/// An address request: register name and its fixed address, if any.
#[derive(Clone, Copy, Debug)]
pub struct AddressRequest<'a> {
    pub name: &'a str,
    pub fixed: Option<u64>,
}

/// Resolves an address for every request, in input order.
///
/// Fails with a conflict error on the module if two or more requests share a
/// fixed address. Unfixed requests receive the smallest multiple of
/// [`WORD_BYTES`] not already taken by a fixed or earlier allocated address.
pub fn allocate_addresses(module: &str, requests: &[AddressRequest<'_>]) -> Result<Vec<u64>> {
    let mut by_address: BTreeMap<u64, Vec<&str>> = BTreeMap::new();
    for req in requests {
        if let Some(addr) = req.fixed {
            by_address.entry(addr).or_default().push(req.name);
        }
    }
    if let Some((addr, names)) = by_address.iter().find(|(_, names)| names.len() > 1) {
        return Err(Error::conflict(
            Entity::module(module),
            format!(
                "registers [{}] have the same addressOffset 0x{addr:x}",
                names.join(", ")
            ),
        ));
    }

    let mut occupied: BTreeSet<u64> = by_address.into_keys().collect();
    let mut resolved = Vec::with_capacity(requests.len());
    for req in requests {
        let addr = match req.fixed {
            Some(addr) => addr,
            None => {
                let mut candidate = 0;
                while occupied.contains(&candidate) {
                    candidate += WORD_BYTES;
                }
                occupied.insert(candidate);
                candidate
            }
        };
        resolved.push(addr);
    }
    Ok(resolved)
}

/// A bit-range request: field name, width and fixed offset, if any.
#[derive(Clone, Copy, Debug)]
pub struct BitRequest<'a> {
    pub name: &'a str,
    pub width: u32,
    pub fixed: Option<u32>,
}

/// Resolves a bit offset for every request, in input order.
///
/// `register` and `register_width` describe the bit space. Fixed ranges
/// that leave `[0, register_width)` are range errors, fixed ranges that
/// overlap each other are conflict errors, and an unfixed field with no
/// sufficiently long run of free bits is an allocation error.
pub fn allocate_bits(
    register: &str,
    register_width: u32,
    requests: &[BitRequest<'_>],
) -> Result<Vec<u32>> {
    let size = register_width as usize;
    let mut bits: Vec<Option<&str>> = vec![None; size];

    for req in requests {
        let Some(offset) = req.fixed else {
            continue;
        };
        let end = u64::from(offset) + u64::from(req.width);
        if end > u64::from(register_width) {
            return Err(Error::range(
                Entity::field(req.name),
                format!(
                    "bits [{}:{offset}] lie outside of register '{register}' ({register_width} bits)",
                    end.saturating_sub(1)
                ),
            ));
        }
        for slot in &mut bits[offset as usize..end as usize] {
            if let Some(owner) = slot {
                return Err(Error::conflict(
                    Entity::field(req.name),
                    format!("overlaps field '{owner}' in register '{register}'"),
                ));
            }
            *slot = Some(req.name);
        }
    }

    let mut resolved = Vec::with_capacity(requests.len());
    for req in requests {
        if let Some(offset) = req.fixed {
            resolved.push(offset);
            continue;
        }
        let start = first_fit(&bits, req.width as usize).ok_or_else(|| {
            Error::allocation(
                Entity::field(req.name),
                format!(
                    "could not allocate {} bits in register '{register}'",
                    req.width
                ),
            )
        })?;
        for slot in &mut bits[start..start + req.width as usize] {
            *slot = Some(req.name);
        }
        resolved.push(start as u32);
    }
    Ok(resolved)
}

/// Lowest start position of a free run of at least `width` slots.
fn first_fit(bits: &[Option<&str>], width: usize) -> Option<usize> {
    (0..bits.len())
        .filter(|&start| bits[start].is_none())
        .find(|&start| {
            let run = bits[start..].iter().take_while(|b| b.is_none()).count();
            run >= width
        })
}
