//! Message id list <-> registry record mapper

use potd_core::Snowflake;

use crate::models::RegistryRecord;

impl From<RegistryRecord> for Vec<Snowflake> {
    fn from(record: RegistryRecord) -> Self {
        record.message_list
    }
}

impl From<&[Snowflake]> for RegistryRecord {
    fn from(ids: &[Snowflake]) -> Self {
        RegistryRecord {
            message_list: ids.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_written_as_strings() {
        let ids = [Snowflake::new(1_455_208_815_552_237_689), Snowflake::new(42)];
        let record = RegistryRecord::from(&ids[..]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"messageList":["1455208815552237689","42"]}"#
        );
    }

    #[test]
    fn test_reads_string_ids_in_order() {
        let record: RegistryRecord =
            serde_json::from_str(r#"{"messageList":["30","10","20"]}"#).unwrap();
        let ids: Vec<Snowflake> = record.into();
        assert_eq!(ids, vec![Snowflake::new(30), Snowflake::new(10), Snowflake::new(20)]);
    }
}
