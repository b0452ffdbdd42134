use super::IVehicleRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::NaiveDate;
use skifte_domain::{Vehicle, ID};

pub struct InMemoryVehicleRepo {
    vehicles: std::sync::Mutex<Vec<Vehicle>>,
}

impl InMemoryVehicleRepo {
    pub fn new() -> Self {
        Self {
            vehicles: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IVehicleRepo for InMemoryVehicleRepo {
    async fn insert(&self, vehicle: &Vehicle) -> anyhow::Result<()> {
        insert(vehicle, &self.vehicles);
        Ok(())
    }

    async fn save(&self, vehicle: &Vehicle) -> anyhow::Result<()> {
        save(vehicle, &self.vehicles);
        Ok(())
    }

    async fn find(&self, vehicle_id: &ID) -> Option<Vehicle> {
        find(vehicle_id, &self.vehicles)
    }

    async fn find_by_renewal_date(&self, renewal_date: NaiveDate) -> anyhow::Result<Vec<Vehicle>> {
        let res = find_by(&self.vehicles, |vehicle| {
            vehicle.renewal_date == renewal_date
        });
        Ok(res)
    }

    async fn delete(&self, vehicle_id: &ID) -> Option<Vehicle> {
        delete(vehicle_id, &self.vehicles)
    }
}
