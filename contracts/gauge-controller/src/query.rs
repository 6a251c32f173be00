use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Decimal, Uint128};

use crate::state::{Board, Config, Gauge, ProxyVoter, VotedSlope};

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(AdminResponse)]
    Admin {},

    #[returns(BoardResponse)]
    Board { board_id: u64 },

    #[returns(BoardsResponse)]
    Boards {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(GaugeResponse)]
    Gauge { gauge: String },

    #[returns(GaugesResponse)]
    Gauges {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(IsGaugeKilledResponse)]
    IsGaugeKilled { gauge: String },

    #[returns(GaugeCapResponse)]
    GaugeCap { gauge: String },

    #[returns(BoardForGaugeResponse)]
    BoardForGauge { gauge: String },

    #[returns(DistributorForGaugeResponse)]
    DistributorForGauge { gauge: String },

    #[returns(WeightResponse)]
    GaugeWeight {
        gauge: String,
        timestamp: Option<u64>,
    },

    #[returns(WeightResponse)]
    TotalWeight { timestamp: Option<u64> },

    #[returns(GaugeRelativeWeightResponse)]
    GaugeRelativeWeight {
        gauge: String,
        timestamp: Option<u64>,
    },

    #[returns(UserVoteResponse)]
    UserVote { user: String, gauge: String },

    #[returns(UserVotePowerResponse)]
    UserVotePower { user: String },

    #[returns(ProxyVoterResponse)]
    ProxyVoter { owner: String, proxy: String },

    #[returns(UserProxyVotersResponse)]
    UserProxyVoters { owner: String },

    #[returns(IsProxyManagerResponse)]
    IsProxyManager { owner: String, manager: String },

    #[returns(GaugeSlopeChangesResponse)]
    GaugeSlopeChanges {
        gauge: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub config: Config,
}

#[cw_serde]
pub struct AdminResponse {
    pub admin: Addr,
    pub new_admin_proposal: Option<Addr>,
}

#[cw_serde]
pub struct BoardResponse {
    pub board: Board,
}

#[cw_serde]
pub struct BoardsResponse {
    pub boards: Vec<Board>,
}

#[cw_serde]
pub struct GaugeResponse {
    pub gauge: Gauge,
}

#[cw_serde]
pub struct GaugesResponse {
    pub gauges: Vec<Gauge>,
}

#[cw_serde]
pub struct IsGaugeKilledResponse {
    pub killed: bool,
}

#[cw_serde]
pub struct GaugeCapResponse {
    pub cap: Decimal,
}

#[cw_serde]
pub struct BoardForGaugeResponse {
    pub board: Addr,
}

#[cw_serde]
pub struct DistributorForGaugeResponse {
    pub distributor: Addr,
}

#[cw_serde]
pub struct WeightResponse {
    pub weight: Uint128,
    pub slope: Uint128,
    /// Time the stored checkpoint was last brought up to date, if there is one.
    pub last_update: Option<u64>,
}

#[cw_serde]
pub struct GaugeRelativeWeightResponse {
    pub relative_weight: Decimal,
    pub timestamp: u64,
}

#[cw_serde]
pub struct UserVoteResponse {
    pub vote: Option<VotedSlope>,
    pub last_vote: Option<u64>,
}

#[cw_serde]
pub struct UserVotePowerResponse {
    pub total: u64,
    pub free: u64,
    pub blocked_proxy_power: u64,
}

#[cw_serde]
pub struct ProxyVoterResponse {
    pub proxy_voter: Option<ProxyVoter>,
}

#[cw_serde]
pub struct UserProxyVoter {
    pub proxy: Addr,
    pub proxy_voter: ProxyVoter,
}

#[cw_serde]
pub struct UserProxyVotersResponse {
    pub proxies: Vec<UserProxyVoter>,
}

#[cw_serde]
pub struct IsProxyManagerResponse {
    pub is_manager: bool,
}

#[cw_serde]
pub struct GaugeSlopeChangesResponse {
    /// Scheduled (week, slope decrement) pairs, in ascending week order.
    pub changes: Vec<(u64, Uint128)>,
}
