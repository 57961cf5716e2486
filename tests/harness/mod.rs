// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for admission guard attack simulation.
//!
//! This module provides utilities for simulating abusive traffic patterns
//! against the admission gate to validate security controls.

pub mod attacks;
pub mod generators;
pub mod metrics;
