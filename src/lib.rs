#![forbid(unsafe_code)]
//! A crate for decoding proprietary game-resource archive containers.
//!
//! Dozens of unrelated visual-novel engines ship their assets in bespoke
//! archive formats, but nearly all of them are built from the same handful of
//! primitives: a bounds-checked view over the container, a bit-level cursor,
//! a sliding-window (LZSS-family) decompressor and a few lightweight stream
//! ciphers. This crate implements those primitives once, parameterized per
//! format, so that supporting a new format means writing an index parser and
//! filling in a configuration struct rather than hand-rolling yet another
//! decoder.

#![no_std]
#![allow(clippy::needless_return)]

extern crate alloc;

pub mod bits;
pub mod cipher;
pub mod codec;
pub mod entry;
pub mod formats;
pub mod read;
pub mod source;
