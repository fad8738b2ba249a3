use std::fmt::Display;

use chrono::{DateTime, Utc};
use log::error;
use qpg_common::Vnd;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

//--------------------------------------      TxSource       ---------------------------------------------------------
/// The payment-gateway provider a transaction record originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxSource {
    SePay,
    Casso,
}

impl TxSource {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::SePay => "sepay",
            Self::Casso => "casso",
        }
    }

    /// Build the store id for a provider-native id. Casso ids are prefixed so that they can never collide with
    /// SePay ids carrying the same native value. SePay ids are used as-is.
    pub fn namespaced_id(&self, native_id: &str) -> String {
        match self {
            Self::SePay => native_id.to_string(),
            Self::Casso => format!("casso_{native_id}"),
        }
    }
}

impl Display for TxSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

//--------------------------------------  TransferDirection  ---------------------------------------------------------
/// The direction of a transfer as seen from the merchant's account. Only incoming transfers participate in
/// payment matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferDirection {
    In,
    #[default]
    Out,
}

impl From<String> for TransferDirection {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "in" => Self::In,
            "out" | "" => Self::Out,
            s => {
                error!("🗄️ Unknown transfer type '{s}' in transaction record. Treating it as an outgoing transfer.");
                Self::Out
            },
        }
    }
}

impl Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::Out => f.write_str("out"),
        }
    }
}

// Providers put free-form strings in the transfer-type field, so deserialization must be lenient rather than
// rejecting the whole record.
impl<'de> Deserialize<'de> for TransferDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

impl Serialize for TransferDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

//--------------------------------------    CassoOriginal    ---------------------------------------------------------
/// The provider-specific fields of a Casso webhook entry, preserved verbatim for auditing. The match engine never
/// looks inside this bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CassoOriginal {
    pub id: i64,
    #[serde(default)]
    pub tid: String,
    #[serde(default)]
    pub corresponsive_name: String,
    #[serde(default)]
    pub corresponsive_account: String,
    #[serde(default)]
    pub corresponsive_bank_id: String,
    #[serde(default)]
    pub corresponsive_bank_name: String,
    #[serde(default)]
    pub virtual_account_name: String,
}

//--------------------------------------      Transaction    ---------------------------------------------------------
/// The canonical, provider-agnostic transaction record. Gateway adapters build these from raw webhook payloads;
/// once inserted into the store a record is never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Globally unique across providers; Casso ids carry a `casso_` prefix.
    pub id: String,
    /// Display name of the originating bank.
    pub gateway: String,
    /// Provider-supplied timestamp string. Opaque to the engine; only displayed.
    pub transaction_date: String,
    /// Destination account or sub-account identifier.
    pub account_number: String,
    /// Provider-supplied reference code, when the provider has one.
    pub code: Option<String>,
    /// Free-text transfer memo. This is the field the match engine searches.
    pub content: String,
    pub transfer_type: TransferDirection,
    /// Absolute transfer amount; sign information lives in `transfer_type`.
    pub transfer_amount: Vnd,
    /// Running account balance at the time of the transaction, as reported by the provider.
    pub accumulated: Vnd,
    pub sub_account: Option<String>,
    /// Provider transaction/trace id, for display.
    pub reference_code: String,
    pub description: String,
    /// Stamped by the gateway adapter at webhook-receipt time. This, not the bank's timestamp, is the clock the
    /// matching window is measured against. Records that lost it (e.g. through a hand-edited snapshot) are treated
    /// as arbitrarily old and never match.
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    pub source: TxSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casso_original: Option<CassoOriginal>,
}

impl Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} via {} ({}): {}",
            self.id, self.transfer_type, self.transfer_amount, self.gateway, self.source, self.content
        )
    }
}
