//! Slot persistence over internal flash.
//!
//! Slots map to `sequential-storage` map keys inside a reserved region
//! at the top of the 4 MB flash; the crate handles wear levelling and
//! garbage collection across the pages.  The async storage API is
//! driven to completion inline - flash ops on this part are short and
//! the firmware has nothing else to run meanwhile.

use core::ops::Range;

use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_futures::block_on;
use esp_storage::FlashStorage;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use crate::config::{SLOT_BUF_SIZE, SLOT_NETWORKS, SLOT_PAIRS, SLOT_QUOTES, SLOT_SESSION};
use crate::error::StoreError;
use crate::traits::SlotStore;

/// Reserved storage region (top 64 KB of a 4 MB part).
const STORAGE_RANGE: Range<u32> = 0x003F_0000..0x0040_0000;

fn slot_key(slot: &str) -> Option<u8> {
    match slot {
        SLOT_NETWORKS => Some(0x01),
        SLOT_PAIRS => Some(0x02),
        SLOT_SESSION => Some(0x03),
        SLOT_QUOTES => Some(0x04),
        _ => None,
    }
}

pub struct FlashStore {
    flash: BlockingAsync<FlashStorage>,
    scratch: [u8; SLOT_BUF_SIZE],
}

impl FlashStore {
    pub fn new(flash: FlashStorage) -> Self {
        Self {
            flash: BlockingAsync::new(flash),
            scratch: [0u8; SLOT_BUF_SIZE],
        }
    }
}

impl SlotStore for FlashStore {
    fn read_slot(&mut self, slot: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        let key = slot_key(slot).ok_or(StoreError::Read)?;
        let found = block_on(fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
        ))
        .map_err(|_| StoreError::Read)?;

        match found {
            None => Ok(None),
            Some(data) => {
                if data.len() > buf.len() {
                    return Err(StoreError::Read);
                }
                buf[..data.len()].copy_from_slice(data);
                Ok(Some(data.len()))
            }
        }
    }

    fn write_slot(&mut self, slot: &str, data: &[u8]) -> Result<(), StoreError> {
        let key = slot_key(slot).ok_or(StoreError::Write)?;
        block_on(store_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
            &data,
        ))
        .map_err(|_| StoreError::Write)
    }
}
