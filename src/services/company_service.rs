use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::{parse_id, validation, ServiceError};
use crate::database::models::Company;
use crate::database::Repository;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: i64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone)]
pub struct CompanyService {
    companies: Repository<Company>,
}

impl CompanyService {
    pub fn new(companies: Repository<Company>) -> Self {
        Self { companies }
    }

    pub async fn create(&self, owner: Uuid, profile: CompanyProfile) -> Result<Company, ServiceError> {
        validation::required("company name", &profile.name)?;
        if !profile.phone.is_empty() {
            validation::phone(&profile.phone)?;
        }
        if !profile.website.is_empty() {
            validation::http_url("website", &profile.website)?;
        }

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            user_id: owner,
            name: profile.name,
            company_size: profile.company_size,
            avatar: profile.avatar,
            address: profile.address,
            city: profile.city,
            state: profile.state,
            pincode: profile.pincode,
            country: profile.country,
            phone: profile.phone,
            website: profile.website,
            description: profile.description,
            created_at: now,
            updated_at: now,
        };
        self.companies.insert(&company).await?;

        tracing::info!("Identity {} created company {}", owner, company.id);
        Ok(company)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Company, ServiceError> {
        let id = parse_id("company", raw_id)?;
        self.companies
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("company"))
    }
}
