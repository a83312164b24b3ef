use std::any::type_name;

use dango_core::{
    Addr, Binary, ChainInfo, Coins, ContractInfo, GenericResult, Hash256, Json, KeyHash,
    ProtocolMismatch, Query, QueryResponse, TxOutcome, Uint128, UnsignedTx,
};
use dango_rpc::{AbciQuery, Transport};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::trace;

use crate::{client::Client, error::ClientError};

/// Decode a JSON payload into the type the caller asked for.
fn decode_as<R: DeserializeOwned>(value: Json) -> Result<R, ClientError> {
    serde_json::from_value(value.clone())
        .map_err(|_| ProtocolMismatch::new(type_name::<R>(), &value).into())
}

fn decode_slice_as<R: DeserializeOwned>(
    bytes: &[u8],
    expected: &'static str,
) -> Result<R, ClientError> {
    serde_json::from_slice(bytes).map_err(|_| {
        ProtocolMismatch { expected, body: String::from_utf8_lossy(bytes).into_owned() }.into()
    })
}

impl<T: Transport> Client<T> {
    /// Raw ABCI query. Height 0 means latest.
    pub async fn query(
        &self,
        path: &str,
        data: &[u8],
        height: u64,
        prove: bool,
    ) -> Result<AbciQuery, ClientError> {
        Ok(self.transport().query(path, data, height, prove).await?)
    }

    /// Raw value stored under `key` in the chain's store, `None` if absent.
    pub async fn query_store(
        &self,
        key: &[u8],
        height: u64,
        prove: bool,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        let res = self.query("/store", key, height, prove).await?;
        Ok((!res.value.is_empty()).then_some(res.value))
    }

    /// Query the app. The response is decoded but not checked against the
    /// request; the typed helpers below do that.
    pub async fn query_app(
        &self,
        query: &Query,
        height: u64,
    ) -> Result<QueryResponse, ClientError> {
        trace!(target: "dango::rpc", kind = query.kind(), height, "app query");
        let data = serde_json::to_vec(query)?;
        let res = self.query("/app", &data, height, false).await?;
        let body: Json = decode_slice_as(&res.value, query.kind())?;
        Ok(QueryResponse::from_json(body)?)
    }

    /// Several queries answered at the same height, in order.
    pub async fn query_multi(
        &self,
        queries: Vec<Query>,
        height: u64,
    ) -> Result<Vec<GenericResult<QueryResponse>>, ClientError> {
        Ok(self.query_app(&Query::Multi(queries), height).await?.as_multi()?)
    }

    pub async fn get_chain_info(&self, height: u64) -> Result<ChainInfo, ClientError> {
        Ok(self.query_app(&Query::info(), height).await?.as_info()?)
    }

    pub async fn get_config(&self, height: u64) -> Result<Json, ClientError> {
        Ok(self.query_app(&Query::Config {}, height).await?.as_config()?)
    }

    /// App configuration, decoded into the application's own type.
    pub async fn get_app_config<R: DeserializeOwned>(&self, height: u64) -> Result<R, ClientError> {
        decode_as(self.query_app(&Query::app_config(), height).await?.as_app_config()?)
    }

    pub async fn get_balance(
        &self,
        address: Addr,
        denom: &str,
        height: u64,
    ) -> Result<Uint128, ClientError> {
        Ok(self.query_app(&Query::balance(address, denom), height).await?.as_balance()?.amount)
    }

    pub async fn get_balances(
        &self,
        address: Addr,
        start_after: Option<String>,
        limit: Option<u32>,
        height: u64,
    ) -> Result<Coins, ClientError> {
        let query = Query::Balances { address, start_after, limit };
        Ok(self.query_app(&query, height).await?.as_balances()?)
    }

    pub async fn get_supply(&self, denom: &str, height: u64) -> Result<Uint128, ClientError> {
        Ok(self.query_app(&Query::supply(denom), height).await?.as_supply()?.amount)
    }

    pub async fn get_code(&self, hash: Hash256, height: u64) -> Result<Json, ClientError> {
        Ok(self.query_app(&Query::Code { hash }, height).await?.as_code()?)
    }

    pub async fn get_contract_info(
        &self,
        address: Addr,
        height: u64,
    ) -> Result<ContractInfo, ClientError> {
        Ok(self.query_app(&Query::contract(address), height).await?.as_contract()?)
    }

    pub async fn query_wasm_raw(
        &self,
        contract: Addr,
        key: impl Into<Binary>,
        height: u64,
    ) -> Result<Option<Binary>, ClientError> {
        Ok(self.query_app(&Query::wasm_raw(contract, key), height).await?.as_wasm_raw()?)
    }

    /// Call a contract's query entry point and decode its answer as `R`.
    pub async fn query_wasm_smart<M, R>(
        &self,
        contract: Addr,
        msg: &M,
        height: u64,
    ) -> Result<R, ClientError>
    where
        M: Serialize,
        R: DeserializeOwned,
    {
        let query = Query::wasm_smart(contract, msg)?;
        decode_as(self.query_app(&query, height).await?.as_wasm_smart()?)
    }

    /// Current sequence of an account, 0 when the account has never
    /// transacted.
    pub async fn get_sequence(&self, account: Addr) -> Result<u32, ClientError> {
        let state: Json = self.query_wasm_smart(account, &json!({ "state": {} }), 0).await?;
        let Some(fields) = state.as_object() else {
            return Err(ProtocolMismatch::new("sequence", &state).into());
        };
        match fields.get("sequence") {
            None | Some(Json::Null) => Ok(0),
            Some(sequence) => sequence
                .as_u64()
                .and_then(|seq| u32::try_from(seq).ok())
                .ok_or_else(|| ProtocolMismatch::new("sequence", &state).into()),
        }
    }

    /// Dry-run `tx` and report the gas it used. An execution error is part
    /// of the returned outcome, not an `Err`.
    pub async fn simulate(&self, tx: &UnsignedTx) -> Result<TxOutcome, ClientError> {
        let data = serde_json::to_vec(tx)?;
        let res = self.query("/simulate", &data, 0, false).await?;
        decode_slice_as(&res.value, "tx_outcome")
    }

    /// Address `deployer` will get for a contract instantiated from
    /// `code_hash` with `salt`. Local, no round trip.
    pub fn compute_address(&self, deployer: Addr, code_hash: Hash256, salt: &[u8]) -> Addr {
        Addr::compute(deployer, code_hash, salt)
    }

    /// Key hash of the attached signer.
    pub async fn key_id(&self) -> Result<KeyHash, ClientError> {
        let signer = self.signer().ok_or_else(ClientError::missing_signer)?;
        signer.key_id().await.map_err(ClientError::Signer)
    }
}
