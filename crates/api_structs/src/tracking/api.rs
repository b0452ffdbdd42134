use serde::{Deserialize, Serialize};

// Tracking ids arrive as plain strings: a malformed or unknown id must not
// fail deserialization, the endpoints still answer with their fixed
// image/redirect response.

pub mod track_open {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QueryParams {
        pub id: Option<String>,
    }
}

pub mod track_click {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QueryParams {
        pub id: Option<String>,
        pub url: Option<String>,
    }
}

pub mod track_action {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QueryParams {
        pub id: Option<String>,
        pub action: Option<String>,
    }
}
