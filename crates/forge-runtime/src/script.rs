//! # Replay Scripts
//!
//! A script is a JSON array of steps, each tagged by `op`. Seeding steps write
//! straight into the in-memory collaborators; request steps go through the
//! minting service exactly as an external caller would.
//!
//! ```json
//! [
//!   {"op": "assign_external", "id": 7, "owner": "0xa1a1...a1"},
//!   {"op": "mint", "caller": "0xa1a1...a1", "source": "EXTERNAL_ENTRY", "use_index": 7},
//!   {"op": "admin", "command": {"command": "advance_epoch"}}
//! ]
//! ```

use rm_01_authorization::AuthorizationProof;
use rm_02_monster_minting::config::AdminCommand;
use rm_02_monster_minting::domain::entities::FusionRequest;
use serde::{Deserialize, Serialize};
use shared_types::{
    Address, EntityId, FusionVariant, HashKind, ItemId, SourceType, Timestamp, U256,
};

/// Proof lifetime used when an order gives no expiry.
pub const DEFAULT_PROOF_TTL: u64 = 3600;

/// A signed mint or refresh order.
///
/// Without `proof` the runtime signs the order with its configured key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStep {
    /// Requester.
    pub caller: Address,
    /// Source to mint from.
    pub source: SourceType,
    /// Slot within the source.
    pub use_index: u64,
    /// Currency cost.
    #[serde(default)]
    pub cost: U256,
    /// Proof expiry; now plus `DEFAULT_PROOF_TTL` when absent.
    #[serde(default)]
    pub expiry: Option<Timestamp>,
    /// Pre-made proof.
    #[serde(default)]
    pub proof: Option<AuthorizationProof>,
}

/// A fusion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseStep {
    /// Fusion flavour.
    pub variant: FusionVariant,
    /// Owner of both inputs.
    pub owner: Address,
    /// Requester, `owner` when absent.
    #[serde(default)]
    pub caller: Option<Address>,
    /// First input.
    pub input_a: EntityId,
    /// Second input.
    pub input_b: EntityId,
    /// Items to burn.
    #[serde(default)]
    pub item_ids: Vec<ItemId>,
    /// Units per item, matched by position.
    #[serde(default)]
    pub item_amounts: Vec<u64>,
}

impl FuseStep {
    /// Who submits the fusion.
    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller.unwrap_or(self.owner)
    }

    /// The service request for this step.
    #[must_use]
    pub fn request(&self) -> FusionRequest {
        FusionRequest {
            owner: self.owner,
            input_a: self.input_a,
            input_b: self.input_b,
            item_ids: self.item_ids.clone(),
            item_amounts: self.item_amounts.clone(),
        }
    }
}

/// One script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    // Seeding
    /// Adds currency to an account.
    CreditCurrency {
        /// Account.
        owner: Address,
        /// Amount added.
        amount: U256,
    },
    /// Adds item units to an account.
    CreditItems {
        /// Account.
        owner: Address,
        /// Item kind.
        item: ItemId,
        /// Units added.
        amount: u64,
    },
    /// Gives an external collection entry to `owner`.
    AssignExternal {
        /// Entry id.
        id: EntityId,
        /// New owner.
        owner: Address,
    },
    /// Issues a hash entity.
    IssueHash {
        /// Registry.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
        /// Owner.
        owner: Address,
        /// Limit group.
        group: u64,
        /// Detail within the group.
        detail: u64,
    },
    /// Issues a chip.
    IssueChip {
        /// Chip id.
        id: EntityId,
        /// Owner.
        owner: Address,
        /// Chip sub-type.
        sub_type: u64,
    },
    /// Moves a monster to another owner.
    TransferMonster {
        /// Monster id.
        id: EntityId,
        /// Recipient.
        to: Address,
    },
    /// Moves a hash to another owner.
    TransferHash {
        /// Registry.
        kind: HashKind,
        /// Hash id.
        id: EntityId,
        /// Recipient.
        to: Address,
    },

    // Clock
    /// Sets the clock.
    SetTime {
        /// Unix seconds.
        now: Timestamp,
    },
    /// Moves the clock forward.
    AdvanceTime {
        /// Seconds to add.
        secs: u64,
    },

    // Requests
    /// Signed mint.
    Mint(OrderStep),
    /// Signed regeneration refresh.
    Refresh(OrderStep),
    /// One-shot free mint.
    MintFree {
        /// Requester.
        caller: Address,
    },
    /// Item-backed mint.
    MintFromItem {
        /// Requester.
        caller: Address,
        /// Item kind.
        item: ItemId,
    },
    /// Fusion.
    Fuse(FuseStep),
    /// Privileged configuration change.
    Admin {
        /// Command to apply.
        command: AdminCommand,
    },

    // Queries
    /// Lists monsters held by `owner`.
    TokensOf {
        /// Account.
        owner: Address,
    },
}

impl ScriptStep {
    /// The `op` tag.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            ScriptStep::CreditCurrency { .. } => "credit_currency",
            ScriptStep::CreditItems { .. } => "credit_items",
            ScriptStep::AssignExternal { .. } => "assign_external",
            ScriptStep::IssueHash { .. } => "issue_hash",
            ScriptStep::IssueChip { .. } => "issue_chip",
            ScriptStep::TransferMonster { .. } => "transfer_monster",
            ScriptStep::TransferHash { .. } => "transfer_hash",
            ScriptStep::SetTime { .. } => "set_time",
            ScriptStep::AdvanceTime { .. } => "advance_time",
            ScriptStep::Mint(_) => "mint",
            ScriptStep::Refresh(_) => "refresh",
            ScriptStep::MintFree { .. } => "mint_free",
            ScriptStep::MintFromItem { .. } => "mint_from_item",
            ScriptStep::Fuse(_) => "fuse",
            ScriptStep::Admin { .. } => "admin",
            ScriptStep::TokensOf { .. } => "tokens_of",
        }
    }

    /// Whether the step goes through the minting service.
    #[must_use]
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            ScriptStep::Mint(_)
                | ScriptStep::Refresh(_)
                | ScriptStep::MintFree { .. }
                | ScriptStep::MintFromItem { .. }
                | ScriptStep::Fuse(_)
        )
    }
}

/// Parses a script document.
pub fn parse_script(raw: &str) -> serde_json::Result<Vec<ScriptStep>> {
    serde_json::from_str(raw)
}
