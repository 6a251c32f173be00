use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use lock_power_interface::{
    BalanceResponse, LockedEndResponse, TotalLockedResponse, UserPointResponse,
};
use ve_boost::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg};
use ve_boost::query::{
    AdjustedBalanceResponse, AdminResponse, AllowanceResponse, BoostResponse, BoostsResponse,
    CheckpointResponse, ConfigResponse, QueryMsg,
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
    export_schema(&schema_for!(BalanceResponse), &out_dir);
    export_schema(&schema_for!(LockedEndResponse), &out_dir);
    export_schema(&schema_for!(TotalLockedResponse), &out_dir);
    export_schema(&schema_for!(UserPointResponse), &out_dir);
    export_schema(&schema_for!(AdjustedBalanceResponse), &out_dir);
    export_schema(&schema_for!(CheckpointResponse), &out_dir);
    export_schema(&schema_for!(AllowanceResponse), &out_dir);
    export_schema(&schema_for!(BoostResponse), &out_dir);
    export_schema(&schema_for!(BoostsResponse), &out_dir);
}
