use serde::{Deserialize, Serialize};
use skifte_domain::{OffsetRunReport, ID};

pub mod run_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reports: Vec<OffsetRunReport>,
    }

    impl APIResponse {
        pub fn new(reports: Vec<OffsetRunReport>) -> Self {
            Self { reports }
        }
    }
}

pub mod send_test_reminder {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub vehicle_id: ID,
        pub offset: i64,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message_id: String,
    }

    impl APIResponse {
        pub fn new(message_id: String) -> Self {
            Self { message_id }
        }
    }
}
