use serde::{Deserialize, Serialize};

use bidchain_ledger::Block;
use bidchain_types::{ImpId, Price};

use crate::error::{ProtocolError, ProtocolResult};

pub const PROTOCOL_VERSION: u32 = 1;
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Ledger snapshot attached to an OpenRTB object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerExt {
    pub blockchain: Vec<Block>,
}

/// OpenRTB bid request sent by the originating ad server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    pub id: String,
    pub imp: Vec<Imp>,
    pub ext: LedgerExt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Imp {
    pub id: String,
    pub bidfloor: Price,
}

impl BidRequest {
    /// Wrap a ledger in a single-impression request with `price` as floor.
    pub fn for_ledger(imp_id: &ImpId, price: Price, blocks: Vec<Block>) -> Self {
        Self {
            id: imp_id.to_string(),
            imp: vec![Imp {
                id: imp_id.to_string(),
                bidfloor: price,
            }],
            ext: LedgerExt { blockchain: blocks },
        }
    }

    /// Floor of the first impression.
    pub fn bidfloor(&self) -> ProtocolResult<Price> {
        self.imp
            .first()
            .map(|imp| imp.bidfloor)
            .ok_or(ProtocolError::MissingImpression)
    }
}

/// OpenRTB bid response returned by the responding ad server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidResponse {
    pub id: String,
    pub seatbid: Vec<SeatBid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatBid {
    pub bid: Vec<Bid>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: String,
    pub impid: String,
    pub price: Price,
    pub ext: LedgerExt,
}

impl BidResponse {
    /// A single seat bid at `price` carrying the extended ledger.
    pub fn for_ledger(imp_id: &ImpId, price: Price, blocks: Vec<Block>) -> Self {
        Self {
            id: imp_id.to_string(),
            seatbid: vec![SeatBid {
                bid: vec![Bid {
                    id: imp_id.to_string(),
                    impid: imp_id.to_string(),
                    price,
                    ext: LedgerExt { blockchain: blocks },
                }],
            }],
        }
    }

    fn first_bid(&self) -> ProtocolResult<&Bid> {
        self.seatbid
            .first()
            .and_then(|seat| seat.bid.first())
            .ok_or(ProtocolError::MissingBid)
    }

    /// Ledger carried by the first bid of the first seat.
    pub fn ledger(&self) -> ProtocolResult<&[Block]> {
        Ok(&self.first_bid()?.ext.blockchain)
    }

    pub fn price(&self) -> ProtocolResult<Price> {
        Ok(self.first_bid()?.price)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub bid_chain: Vec<Block>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
}

/// Body of the originator endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    pub imp_id: ImpId,
    pub initial_price: Price,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidResponse {
    pub ortb_response: BidResponse,
    pub is_valid_local: bool,
    pub is_valid_remote: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidchain_issuer::Issuer;
    use serde_json::json;

    fn imp() -> ImpId {
        ImpId::new("imp-1").unwrap()
    }

    fn price(v: f64) -> Price {
        Price::new(v).unwrap()
    }

    fn sample_blocks() -> Vec<Block> {
        Issuer::create(Some(imp()), Some(price(5.0)))
            .unwrap()
            .into_ledger()
            .into_blocks()
    }

    #[test]
    fn bid_request_shape() {
        let req = BidRequest::for_ledger(&imp(), price(5.0), sample_blocks());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["id"], "imp-1");
        assert_eq!(value["imp"][0]["id"], "imp-1");
        assert_eq!(value["imp"][0]["bidfloor"], 5.0);
        assert_eq!(value["ext"]["blockchain"].as_array().unwrap().len(), 2);
        assert_eq!(req.bidfloor().unwrap(), price(5.0));
    }

    #[test]
    fn request_without_impressions_has_no_floor() {
        let mut req = BidRequest::for_ledger(&imp(), price(5.0), sample_blocks());
        req.imp.clear();
        assert!(matches!(req.bidfloor(), Err(ProtocolError::MissingImpression)));
    }

    #[test]
    fn bid_response_exposes_ledger() {
        let blocks = sample_blocks();
        let resp = BidResponse::for_ledger(&imp(), price(6.0), blocks.clone());
        assert_eq!(resp.ledger().unwrap(), blocks.as_slice());
        assert_eq!(resp.price().unwrap(), price(6.0));

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["seatbid"][0]["bid"][0]["impid"], "imp-1");
    }

    #[test]
    fn empty_seatbid_is_missing_bid() {
        let resp = BidResponse {
            id: "imp-1".into(),
            seatbid: vec![SeatBid { bid: vec![] }],
        };
        assert!(matches!(resp.ledger(), Err(ProtocolError::MissingBid)));
    }

    #[test]
    fn verify_bodies_use_camel_case() {
        let req = VerifyRequest {
            bid_chain: sample_blocks(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("bidChain").is_some());

        let resp = serde_json::to_value(VerifyResponse { is_valid: true }).unwrap();
        assert_eq!(resp, json!({"isValid": true}));
    }

    #[test]
    fn create_bid_request_parses_and_validates() {
        let req: CreateBidRequest =
            serde_json::from_value(json!({"impId": "imp-1", "initialPrice": 5})).unwrap();
        assert_eq!(req.imp_id, imp());
        assert_eq!(req.initial_price, price(5.0));

        assert!(serde_json::from_value::<CreateBidRequest>(
            json!({"impId": "", "initialPrice": 5})
        )
        .is_err());
        assert!(serde_json::from_value::<CreateBidRequest>(
            json!({"impId": "imp-1", "initialPrice": -1})
        )
        .is_err());
    }

    #[test]
    fn error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(value, json!({"error": "boom"}));
    }
}
