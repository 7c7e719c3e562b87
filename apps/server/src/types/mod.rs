// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request and response types.

pub mod request;
pub mod response;

pub use request::{CountRequest, DiffRequest, TableRequest};
pub use response::{
    CountResponse, DiffResponse, ProcessingStats, TableResponse, UploadResponse,
};
