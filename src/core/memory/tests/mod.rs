// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory Bus Tests
//!
//! - `basic`: construction, reset, backing store sizes, cartridge mapping
//! - `regions`: region identification and mirror windows
//! - `access`: widths, byte order and the fast/composed path agreement
//! - `mmio`: interface register lanes

use super::*;

mod access;
