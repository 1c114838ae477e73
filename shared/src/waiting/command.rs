//! Request payloads

use serde::{Deserialize, Serialize};

use super::types::{CancelReason, WaitingSource};

/// Customer contact captured at registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// Register a party in a venue queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTicket {
    pub waiting_type_id: String,
    pub party_size: u32,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub source: WaitingSource,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Staff cancel payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelTicketRequest {
    pub reason: CancelReason,
}

/// Staff memo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoUpdate {
    pub memo: Option<String>,
}

/// Public registration payload (phone required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicRegisterRequest {
    pub waiting_type_id: String,
    pub party_size: u32,
    pub phone: String,
    pub name: Option<String>,
}

/// Public cancel payload: by ticket id or by phone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicCancelRequest {
    pub ticket_id: Option<String>,
    pub phone: Option<String>,
}
