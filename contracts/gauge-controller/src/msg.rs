use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Contract answering `LockPowerQueryMsg`, usually the boost contract.
    pub voting_power_source: Option<String>,
    /// Defaults to ten days.
    pub vote_cooldown: Option<u64>,
    pub default_cap: Decimal,
    pub min_cap: Decimal,
    pub max_cap: Decimal,
}

#[cw_serde]
pub struct GaugeVote {
    pub gauge: String,
    pub power: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    AddBoard {
        board: String,
        distributor: String,
    },
    UpdateDistributor {
        board_id: u64,
        distributor: String,
    },
    AddGauge {
        gauge: String,
        board_id: u64,
        cap: Option<Decimal>,
    },
    UpdateGaugeBoard {
        gauge: String,
        board_id: u64,
    },
    /// None resets the gauge to the default cap.
    UpdateGaugeCap {
        gauge: String,
        cap: Option<Decimal>,
    },
    KillGauge {
        gauge: String,
    },
    UnkillGauge {
        gauge: String,
    },

    /// `power` is in bps of the sender's voting power; 0 removes the vote.
    /// Killed gauges reject any nonzero power but still take 0, so voters can
    /// pull their power out of them.
    VoteForGaugeWeights {
        gauge: String,
        power: u64,
    },
    /// Applies each vote in order, with the same rules as `VoteForGaugeWeights`.
    VoteForManyGaugeWeights {
        votes: Vec<GaugeVote>,
    },
    /// Votes on behalf of `owner`. The sender must be one of the owner's active proxies.
    VoteForGaugeWeightsFor {
        owner: String,
        gauge: String,
        power: u64,
    },

    SetVoterProxy {
        owner: String,
        proxy: String,
        max_power: u64,
        end: u64,
    },
    ClearUserExpiredProxies {
        owner: String,
    },
    ApproveProxyManager {
        manager: String,
    },
    RemoveProxyManager {
        manager: String,
    },
    SetManagerMaxProxyDuration {
        manager: String,
        max_duration: Option<u64>,
    },

    UpdateGaugeWeight {
        gauge: String,
    },
    UpdateTotalWeight {},
    /// Catches the gauge and total weights up, then returns `GaugeRelativeWeightResponse` as data.
    GaugeRelativeWeightWrite {
        gauge: String,
        timestamp: Option<u64>,
    },

    SetVotingPowerSource {
        address: Option<String>,
    },
    UpdateConfig {
        vote_cooldown: Option<u64>,
        default_cap: Option<Decimal>,
        min_cap: Option<Decimal>,
        max_cap: Option<Decimal>,
    },
    ProposeNewAdmin {
        new_admin: Option<String>,
    },
    ClaimAdminRole {},
}

#[cw_serde]
pub struct MigrateMsg {}
