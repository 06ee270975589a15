//! Equipment catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::claims::UserClaims,
    models::enums::EquipmentAvailability,
    models::equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, claims: &UserClaims, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        claims.require_read_equipment()?;
        self.repository.equipment.list(query).await
    }

    pub async fn get_by_id(&self, id: i32, claims: &UserClaims) -> AppResult<Equipment> {
        claims.require_read_equipment()?;
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateEquipment, claims: &UserClaims) -> AppResult<Equipment> {
        claims.require_write_equipment()?;
        data.validate()?;
        self.repository.equipment.create(data, claims.employee_id).await
    }

    /// Update master data; on_loan/missing availability belongs to the
    /// issuance and return paths, not this endpoint
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipment,
        claims: &UserClaims,
    ) -> AppResult<Equipment> {
        claims.require_write_equipment()?;
        data.validate()?;
        if let Some(availability) = data.availability_status {
            if !matches!(
                availability,
                EquipmentAvailability::Available
                    | EquipmentAvailability::UnderMaintenance
                    | EquipmentAvailability::Retired
            ) {
                return Err(AppError::BadRequest(
                    "availability_status can only be set to available, under_maintenance or retired"
                        .to_string(),
                ));
            }
            let current = self.repository.equipment.get_by_id(id).await?;
            if current.availability()? == EquipmentAvailability::OnLoan {
                return Err(AppError::InvalidState(
                    "Equipment on loan must be returned before its availability changes".to_string(),
                ));
            }
        }
        self.repository.equipment.update(id, data, claims.employee_id).await
    }

    pub async fn delete(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        claims.require_write_equipment()?;
        self.repository.equipment.delete(id).await
    }
}
