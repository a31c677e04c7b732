use super::types::{NewRegister, Page, Register, RegisterUpdate};
use super::{ApiClient, ApiError, PAGE_SIZE};
use crate::state::filters::FilterMap;
use reqwest::Method;

/// `page`, `page_size`, then every active filter.
pub fn list_query(page: u32, filters: &FilterMap) -> Vec<(String, String)> {
    let mut query = vec![
        ("page".to_string(), page.to_string()),
        ("page_size".to_string(), PAGE_SIZE.to_string()),
    ];
    query.extend(filters.to_query());
    query
}

#[allow(async_fn_in_trait)]
pub trait RegistersApi {
    async fn get_registers(&self, page: u32, filters: &FilterMap) -> Result<Page<Register>, ApiError>;
    async fn update_register(&self, register_id: i64, update: &RegisterUpdate) -> Result<Register, ApiError>;
    async fn create_register(&self, register: &NewRegister) -> Result<Register, ApiError>;
}

impl RegistersApi for ApiClient {
    async fn get_registers(&self, page: u32, filters: &FilterMap) -> Result<Page<Register>, ApiError> {
        self.get_json("registers/", &list_query(page, filters)).await
    }

    async fn update_register(&self, register_id: i64, update: &RegisterUpdate) -> Result<Register, ApiError> {
        tracing::info!("Updating register {}", register_id);
        self.send_body(Method::PATCH, &format!("registers/{register_id}/"), update)
            .await
    }

    async fn create_register(&self, register: &NewRegister) -> Result<Register, ApiError> {
        self.send_body(Method::POST, "registers/", register).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_layout() {
        let filters = FilterMap::new().with("search", "3N1").with("group", "");
        let query = list_query(2, &filters);
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "20".to_string()),
                ("search".to_string(), "3N1".to_string()),
            ]
        );
    }
}
