use super::IVehicleRepo;
use chrono::NaiveDate;
use skifte_domain::{Vehicle, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresVehicleRepo {
    pool: PgPool,
}

impl PostgresVehicleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct VehicleRaw {
    vehicle_uid: Uuid,
    user_uid: Uuid,
    registration_plate: String,
    nickname: Option<String>,
    renewal_date: NaiveDate,
    current_annual_fee: Option<f64>,
}

impl Into<Vehicle> for VehicleRaw {
    fn into(self) -> Vehicle {
        Vehicle {
            id: self.vehicle_uid.into(),
            user_id: self.user_uid.into(),
            registration_plate: self.registration_plate,
            nickname: self.nickname,
            renewal_date: self.renewal_date,
            current_annual_fee: self.current_annual_fee,
        }
    }
}

#[async_trait::async_trait]
impl IVehicleRepo for PostgresVehicleRepo {
    async fn insert(&self, vehicle: &Vehicle) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles
            (vehicle_uid, user_uid, registration_plate, nickname, renewal_date, current_annual_fee)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(vehicle.id.inner_ref())
        .bind(vehicle.user_id.inner_ref())
        .bind(&vehicle.registration_plate)
        .bind(&vehicle.nickname)
        .bind(vehicle.renewal_date)
        .bind(vehicle.current_annual_fee)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, vehicle: &Vehicle) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET registration_plate = $2,
            nickname = $3,
            renewal_date = $4,
            current_annual_fee = $5
            WHERE vehicle_uid = $1
            "#,
        )
        .bind(vehicle.id.inner_ref())
        .bind(&vehicle.registration_plate)
        .bind(&vehicle.nickname)
        .bind(vehicle.renewal_date)
        .bind(vehicle.current_annual_fee)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, vehicle_id: &ID) -> Option<Vehicle> {
        match sqlx::query_as::<_, VehicleRaw>(
            r#"
            SELECT * FROM vehicles AS v
            WHERE v.vehicle_uid = $1
            "#,
        )
        .bind(vehicle_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(vehicle) => vehicle.map(|v| v.into()),
            Err(_) => None,
        }
    }

    async fn find_by_renewal_date(&self, renewal_date: NaiveDate) -> anyhow::Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, VehicleRaw>(
            r#"
            SELECT * FROM vehicles AS v
            WHERE v.renewal_date = $1
            "#,
        )
        .bind(renewal_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles.into_iter().map(|v| v.into()).collect())
    }

    async fn delete(&self, vehicle_id: &ID) -> Option<Vehicle> {
        match sqlx::query_as::<_, VehicleRaw>(
            r#"
            DELETE FROM vehicles AS v
            WHERE v.vehicle_uid = $1
            RETURNING *
            "#,
        )
        .bind(vehicle_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(vehicle) => vehicle.map(|v| v.into()),
            Err(_) => None,
        }
    }
}
