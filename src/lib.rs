// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod avatar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod form;
pub mod i18n;
pub mod insight;
pub mod kv;
pub mod models;
pub mod offline;
pub mod rates;
pub mod report;
pub mod sanitize;
pub mod storage;
pub mod utils;
