use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use gauge_controller::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg};
use gauge_controller::query::{
    AdminResponse, BoardForGaugeResponse, BoardResponse, BoardsResponse, ConfigResponse,
    DistributorForGaugeResponse, GaugeCapResponse, GaugeRelativeWeightResponse, GaugeResponse,
    GaugeSlopeChangesResponse, GaugesResponse, IsGaugeKilledResponse, IsProxyManagerResponse,
    ProxyVoterResponse, QueryMsg, UserProxyVotersResponse, UserVotePowerResponse,
    UserVoteResponse, WeightResponse,
};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(MigrateMsg), &out_dir);

    export_schema(&schema_for!(ConfigResponse), &out_dir);
    export_schema(&schema_for!(AdminResponse), &out_dir);
    export_schema(&schema_for!(BoardResponse), &out_dir);
    export_schema(&schema_for!(BoardsResponse), &out_dir);
    export_schema(&schema_for!(GaugeResponse), &out_dir);
    export_schema(&schema_for!(GaugesResponse), &out_dir);
    export_schema(&schema_for!(IsGaugeKilledResponse), &out_dir);
    export_schema(&schema_for!(GaugeCapResponse), &out_dir);
    export_schema(&schema_for!(BoardForGaugeResponse), &out_dir);
    export_schema(&schema_for!(DistributorForGaugeResponse), &out_dir);
    export_schema(&schema_for!(WeightResponse), &out_dir);
    export_schema(&schema_for!(GaugeRelativeWeightResponse), &out_dir);
    export_schema(&schema_for!(UserVoteResponse), &out_dir);
    export_schema(&schema_for!(UserVotePowerResponse), &out_dir);
    export_schema(&schema_for!(ProxyVoterResponse), &out_dir);
    export_schema(&schema_for!(UserProxyVotersResponse), &out_dir);
    export_schema(&schema_for!(IsProxyManagerResponse), &out_dir);
    export_schema(&schema_for!(GaugeSlopeChangesResponse), &out_dir);
}
