mod inmemory;
mod postgres;

use chrono::NaiveDate;
pub use inmemory::InMemoryVehicleRepo;
pub use postgres::PostgresVehicleRepo;
use skifte_domain::{Vehicle, ID};

#[async_trait::async_trait]
pub trait IVehicleRepo: Send + Sync {
    async fn insert(&self, vehicle: &Vehicle) -> anyhow::Result<()>;
    async fn save(&self, vehicle: &Vehicle) -> anyhow::Result<()>;
    async fn find(&self, vehicle_id: &ID) -> Option<Vehicle>;
    /// All vehicles whose stored renewal date equals the given date exactly.
    /// The orchestrator queries this once per offset per run.
    async fn find_by_renewal_date(&self, renewal_date: NaiveDate) -> anyhow::Result<Vec<Vehicle>>;
    async fn delete(&self, vehicle_id: &ID) -> Option<Vehicle>;
}
