// SPDX-License-Identifier: Apache-2.0

pub(crate) mod contacts;
pub(crate) mod ops;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
