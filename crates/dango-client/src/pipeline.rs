//! Transaction submission
//!
//! Every submission starts from scratch: chain id, sequence and gas are
//! fetched again each time and nothing is cached. Steps run strictly in
//! order and the first failure aborts the submission without retrying.
//!
//! 1. resolve the chain id (configured, else one `info` query)
//! 2. query the sender's sequence
//! 3. have the signer produce the credential and metadata
//! 4. simulate, unless the gas limit is predefined
//! 5. broadcast
//!
//! Steps 2 through 5 run under the sender's lock, so concurrent submissions
//! from one sender queue up instead of signing the same sequence twice.

use dango_core::{Addr, Hash256, Message, Tx, UnsignedTx, ValidationError};
use dango_rpc::Transport;
use tracing::{debug, info, warn};

use crate::{
    client::Client,
    error::ClientError,
    gas::{GasOption, scaled_gas_limit},
    signer::SignOutcome,
};

impl<T: Transport> Client<T> {
    /// Sign `msgs` as `sender` and broadcast them, returning the tx hash the
    /// node reports.
    pub async fn sign_and_broadcast_tx(
        &self,
        sender: Addr,
        msgs: Vec<Message>,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        self.submit(sender, msgs, gas).await.inspect_err(|err| {
            warn!(target: "dango::pipeline", %sender, error = %err, "tx submission failed");
        })
    }

    async fn submit(
        &self,
        sender: Addr,
        msgs: Vec<Message>,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        let signer = self.signer().ok_or_else(ClientError::missing_signer)?;
        if msgs.is_empty() {
            return Err(ValidationError::EmptyMessages.into());
        }

        let _guard = self.core.locks.acquire(sender).await;

        let chain_id = self.resolve_chain_id().await?;
        let sequence = self.get_sequence(sender).await?;
        debug!(target: "dango::pipeline", %sender, %chain_id, sequence, "signing tx");

        let SignOutcome { credential, data } =
            signer.sign_tx(&msgs, &chain_id, sequence).await.map_err(ClientError::Signer)?;

        let gas_limit = match gas {
            GasOption::Predefined { gas_limit } => gas_limit,
            GasOption::Simulate { scale, flat_increase } => {
                let unsigned = UnsignedTx { sender, msgs: msgs.clone(), data: data.clone() };
                let outcome = self.simulate(&unsigned).await?;
                outcome.result.into_result().map_err(ClientError::Simulation)?;
                let gas_used = outcome.gas_used;
                debug!(target: "dango::pipeline", %sender, gas_used, "simulated tx");
                scaled_gas_limit(gas_used, scale, flat_increase)
            },
        };

        let tx = Tx { sender, gas_limit, msgs, data, credential };
        let local_hash = tx.tx_hash()?;
        debug!(target: "dango::pipeline", %sender, gas_limit, "broadcasting tx");

        let tx_hash = self.transport().broadcast(&tx).await?;
        info!(
            target: "dango::pipeline",
            %sender, sequence, gas_limit, %tx_hash, %local_hash,
            "tx broadcast"
        );

        Ok(tx_hash)
    }

    async fn resolve_chain_id(&self) -> Result<String, ClientError> {
        match self.chain_id() {
            Some(chain_id) => Ok(chain_id.to_string()),
            None => Ok(self.get_chain_info(0).await?.chain_id),
        }
    }
}
