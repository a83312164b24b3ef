use dango_core::{
    Addr, AdminOption, Binary, Coins, Hash256, Json, Message, ValidationError, codec::sha256,
};
use dango_rpc::Transport;
use serde::Serialize;

use crate::{client::Client, error::ClientError, gas::GasOption};

/// Optional parts of an instantiation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstantiateOptions {
    pub label: Option<String>,
    pub admin: AdminOption,
    /// Sent to the new contract along with the instantiation.
    pub funds: Coins,
}

impl InstantiateOptions {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub const fn admin(mut self, admin: AdminOption) -> Self {
        self.admin = admin;
        self
    }

    pub fn funds(mut self, funds: Coins) -> Self {
        self.funds = funds;
        self
    }
}

impl<T: Transport> Client<T> {
    pub async fn transfer(
        &self,
        sender: Addr,
        to: Addr,
        coins: Coins,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        let msg = Message::transfer(to, coins).ok_or(ValidationError::EmptyTransfer)?;
        self.sign_and_broadcast_tx(sender, vec![msg], gas).await
    }

    /// Pay several recipients in one message.
    pub async fn batch_transfer<I>(
        &self,
        sender: Addr,
        transfers: I,
        gas: GasOption,
    ) -> Result<Hash256, ClientError>
    where
        I: IntoIterator<Item = (Addr, Coins)>,
    {
        let msg = Message::batch_transfer(transfers).ok_or(ValidationError::EmptyTransfer)?;
        self.sign_and_broadcast_tx(sender, vec![msg], gas).await
    }

    pub async fn execute<M: Serialize>(
        &self,
        sender: Addr,
        contract: Addr,
        msg: &M,
        funds: Coins,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        let msg = Message::execute(contract, msg, funds)?;
        self.sign_and_broadcast_tx(sender, vec![msg], gas).await
    }

    pub async fn migrate<M: Serialize>(
        &self,
        sender: Addr,
        contract: Addr,
        new_code_hash: Hash256,
        msg: &M,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        let msg = Message::migrate(contract, new_code_hash, msg)?;
        self.sign_and_broadcast_tx(sender, vec![msg], gas).await
    }

    /// Store `code`; returns its hash and the tx hash.
    pub async fn upload(
        &self,
        sender: Addr,
        code: impl Into<Binary>,
        gas: GasOption,
    ) -> Result<(Hash256, Hash256), ClientError> {
        let code = code.into();
        let code_hash = Hash256::from_inner(sha256(&code));
        let tx_hash = self.sign_and_broadcast_tx(sender, vec![Message::upload(code)], gas).await?;
        Ok((code_hash, tx_hash))
    }

    /// Instantiate stored code; returns the new contract's address, known
    /// before the tx lands, and the tx hash.
    pub async fn instantiate<M: Serialize>(
        &self,
        sender: Addr,
        code_hash: Hash256,
        msg: &M,
        salt: impl Into<Binary>,
        options: InstantiateOptions,
        gas: GasOption,
    ) -> Result<(Addr, Hash256), ClientError> {
        let (address, msg) = instantiate_msg(sender, code_hash, msg, salt.into(), options)?;
        let tx_hash = self.sign_and_broadcast_tx(sender, vec![msg], gas).await?;
        Ok((address, tx_hash))
    }

    /// Upload `code` and instantiate it in the same transaction.
    pub async fn upload_and_instantiate<M: Serialize>(
        &self,
        sender: Addr,
        code: impl Into<Binary>,
        msg: &M,
        salt: impl Into<Binary>,
        options: InstantiateOptions,
        gas: GasOption,
    ) -> Result<(Addr, Hash256), ClientError> {
        let code = code.into();
        let code_hash = Hash256::from_inner(sha256(&code));
        let (address, instantiate) = instantiate_msg(sender, code_hash, msg, salt.into(), options)?;
        let msgs = vec![Message::upload(code), instantiate];
        let tx_hash = self.sign_and_broadcast_tx(sender, msgs, gas).await?;
        Ok((address, tx_hash))
    }

    /// Update the chain and/or app configuration. Only the chain owner may.
    pub async fn configure(
        &self,
        sender: Addr,
        new_cfg: Option<Json>,
        new_app_cfg: Option<Json>,
        gas: GasOption,
    ) -> Result<Hash256, ClientError> {
        let msg = Message::configure(new_cfg, new_app_cfg);
        self.sign_and_broadcast_tx(sender, vec![msg], gas).await
    }
}

fn instantiate_msg<M: Serialize>(
    sender: Addr,
    code_hash: Hash256,
    msg: &M,
    salt: Binary,
    options: InstantiateOptions,
) -> Result<(Addr, Message), ClientError> {
    let address = Addr::compute(sender, code_hash, &salt);
    let admin = options.admin.decide(sender, code_hash, &salt);
    let msg = Message::instantiate(code_hash, msg, salt, options.label, admin, options.funds)?;
    Ok((address, msg))
}

#[cfg(test)]
mod tests {
    use dango_core::MsgInstantiate;
    use serde_json::json;

    use super::*;

    const SENDER: Addr = Addr::from_inner([7; 20]);

    #[test]
    fn test_instantiate_msg_predicts_address() {
        let code_hash = Hash256::from_inner([3; 32]);
        let options = InstantiateOptions::default().label("pool").admin(AdminOption::SetToSelf);
        let (address, msg) =
            instantiate_msg(SENDER, code_hash, &json!({ "x": 1 }), b"salt".to_vec().into(), options)
                .unwrap();

        assert_eq!(address, Addr::compute(SENDER, code_hash, b"salt"));
        match msg {
            Message::Instantiate(MsgInstantiate { admin, label, salt, .. }) => {
                assert_eq!(admin, Some(address));
                assert_eq!(label.as_deref(), Some("pool"));
                assert_eq!(&*salt, b"salt");
            },
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_instantiate_msg_without_admin() {
        let (_, msg) = instantiate_msg(
            SENDER,
            Hash256::ZERO,
            &json!({}),
            Binary::default(),
            InstantiateOptions::default(),
        )
        .unwrap();
        let Message::Instantiate(inner) = msg else { panic!("not an instantiate message") };
        assert_eq!(inner.admin, None);
        assert!(inner.funds.is_empty());
    }
}
