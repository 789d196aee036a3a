use super::RangeSet;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Serialized as the flat boundary array; deserialization re-checks ordering.
impl Serialize for RangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.r.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RangeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let boundaries = Vec::<u64>::deserialize(deserializer)?;
        RangeSet::from_boundaries(boundaries).map_err(D::Error::custom)
    }
}
