use super::registers::list_query;
use super::types::{Page, Vehicle, VehicleUpdate};
use super::{ApiClient, ApiError};
use crate::state::filters::FilterMap;
use reqwest::Method;

#[allow(async_fn_in_trait)]
pub trait VehiclesApi {
    async fn get_vehicles(&self, page: u32, filters: &FilterMap) -> Result<Page<Vehicle>, ApiError>;
    async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle, ApiError>;
    async fn update_vehicle(&self, vehicle_id: i64, update: &VehicleUpdate) -> Result<Vehicle, ApiError>;
}

impl VehiclesApi for ApiClient {
    async fn get_vehicles(&self, page: u32, filters: &FilterMap) -> Result<Page<Vehicle>, ApiError> {
        self.get_json("vehicles/data/", &list_query(page, filters)).await
    }

    async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle, ApiError> {
        let query: [(&str, &str); 0] = [];
        self.get_json(&format!("vehicles/data/{vehicle_id}/"), &query).await
    }

    async fn update_vehicle(&self, vehicle_id: i64, update: &VehicleUpdate) -> Result<Vehicle, ApiError> {
        tracing::info!("Updating vehicle {}", vehicle_id);
        self.send_body(Method::PATCH, &format!("vehicles/data/{vehicle_id}/"), update)
            .await
    }
}
