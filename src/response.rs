//! Response bodies of the generated endpoints.

use crate::model::TransferMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize, Debug)]
pub struct Created {
    pub key: Value,
}

#[derive(Serialize, Debug)]
pub struct Modified {
    pub modified: u64,
}

#[derive(Serialize, Debug)]
pub struct Deleted {
    pub deleted: u64,
}

#[derive(Serialize, Debug)]
pub struct SearchBody {
    pub result: Vec<TransferMap>,
}
