//! Region request marshalling
//!
//! Decodes rectangle buffers from request data into regions and encodes
//! regions into reply data, applying the configured [`MarshalPolicy`].

use crate::policy::MarshalPolicy;
use crate::protocol::*;
use crate::region::Region;

/// Bridge between request/reply buffers and the region engine
#[derive(Debug, Clone)]
pub struct RequestMarshaller {
    policy: MarshalPolicy,
    parser: RectParser,
    encoder: RectEncoder,
}

impl RequestMarshaller {
    pub fn new(policy: MarshalPolicy) -> Self {
        RequestMarshaller {
            policy,
            parser: RectParser::new(policy.byte_order),
            encoder: RectEncoder::new(policy.byte_order),
        }
    }

    pub fn policy(&self) -> &MarshalPolicy {
        &self.policy
    }

    /// Decode a region from request data.
    ///
    /// Fails without producing a partial region when the data is not a
    /// whole number of records or exceeds the policy's record limit.
    pub fn decode_region(&self, data: &[u8]) -> RegionResult<Region> {
        let count = RectParser::record_count(data.len()).map_err(|err| {
            log::warn!("Rejecting region data: {}", err);
            err
        })?;

        if !self.policy.allows_request(data.len()) {
            let err = RegionError::TooManyRects {
                count,
                limit: self.policy.max_rects_per_request,
            };
            log::warn!("Rejecting region data: {}", err);
            return Err(err);
        }

        let region = Region::from_request_data_with(&self.parser, data)?;
        log::debug!(
            "Decoded {} rects into region of {} rects, extents {}",
            count,
            region.len(),
            region.extents()
        );
        Ok(region)
    }

    /// Decode a region whose record count is announced separately
    pub fn decode_counted_region(&self, data: &[u8], count: usize) -> RegionResult<Region> {
        let expected = count.checked_mul(RECT_RECORD_SIZE);
        if expected != Some(data.len()) {
            let err = RegionError::CountMismatch {
                count,
                len: data.len(),
            };
            log::warn!("Rejecting region data: {}", err);
            return Err(err);
        }
        self.decode_region(data)
    }

    /// Encode a region for a reply of at most `max_size` bytes (clamped by
    /// the policy)
    pub fn encode_region(&self, region: &Region, max_size: u32) -> RegionData {
        let max_size = self.policy.reply_size(max_size);
        log_reply(region.get_data(&self.encoder, max_size))
    }

    /// Encode a region for a reply and release it
    pub fn encode_region_and_free(&self, region: Region, max_size: u32) -> RegionData {
        let max_size = self.policy.reply_size(max_size);
        log_reply(region.into_data(&self.encoder, max_size))
    }
}

fn log_reply(reply: RegionData) -> RegionData {
    log::debug!(
        "Encoded region reply: {} bytes of {} (buffer {})",
        reply.data.len(),
        reply.total_size,
        reply.max_size
    );
    reply
}

impl Default for RequestMarshaller {
    fn default() -> Self {
        RequestMarshaller::new(MarshalPolicy::default())
    }
}
