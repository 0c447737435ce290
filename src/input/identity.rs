use std::collections::HashSet;

use crate::constants::ID_PREFIX;

/// Hands out identities for attached controllers and keeps track of which
/// ones are currently in use.
///
/// An identity is `ID_PREFIX` followed by the uppercase hex CRC-32 of the
/// device name with a counter appended. The counter starts at zero and is
/// incremented until an identity is found that is not in use, so devices that
/// share a name still receive distinct identities.
#[derive(Debug, Default)]
pub struct IdentityAllocator {
    used: HashSet<String>,
}

impl IdentityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new identity for a device with the given name
    pub fn allocate(&mut self, name: &str) -> String {
        let mut counter: u64 = 0;
        loop {
            let id = generate_id(name, counter);
            if !self.used.contains(&id) {
                log::trace!("Allocated identity {id} for '{name}'");
                self.used.insert(id.clone());
                return id;
            }
            log::trace!("Identity {id} is taken, trying next counter");
            counter += 1;
        }
    }

    /// Release the given identity so it can be handed out again. Returns
    /// false if the identity was not in use.
    pub fn release(&mut self, id: &str) -> bool {
        self.used.remove(id)
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Returns the identity candidate for the given name and counter
pub fn generate_id(name: &str, counter: u64) -> String {
    let checksum = crc32fast::hash(format!("{name}{counter}").as_bytes());
    format!("{ID_PREFIX}{checksum:X}")
}
