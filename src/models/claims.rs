//! JWT claims and rights checks
//!
//! Tokens are issued by the external identity provider; this module only
//! verifies them and exposes the capability checks handlers rely on.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Access level for one functional area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rights {
    None = 0,
    Read = 1,
    Write = 2,
}

/// Per-area rights carried in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRights {
    pub employees_rights: Rights,
    pub applications_rights: Rights,
    pub approvals_rights: Rights,
    pub equipment_rights: Rights,
    pub leave_rights: Rights,
}

impl Default for UserRights {
    fn default() -> Self {
        Self {
            employees_rights: Rights::None,
            applications_rights: Rights::None,
            approvals_rights: Rights::None,
            equipment_rights: Rights::None,
            leave_rights: Rights::None,
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub employee_id: i32,
    pub rights: UserRights,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    pub fn require_read_employees(&self) -> Result<(), AppError> {
        if self.rights.employees_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read employees".to_string()))
        }
    }

    pub fn require_write_employees(&self) -> Result<(), AppError> {
        if self.rights.employees_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage employees".to_string()))
        }
    }

    pub fn require_read_applications(&self) -> Result<(), AppError> {
        if self.rights.applications_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read applications".to_string()))
        }
    }

    pub fn require_write_applications(&self) -> Result<(), AppError> {
        if self.rights.applications_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage applications".to_string()))
        }
    }

    pub fn require_approvals(&self) -> Result<(), AppError> {
        if self.rights.approvals_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to record decisions".to_string()))
        }
    }

    pub fn require_read_equipment(&self) -> Result<(), AppError> {
        if self.rights.equipment_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read equipment".to_string()))
        }
    }

    pub fn require_write_equipment(&self) -> Result<(), AppError> {
        if self.rights.equipment_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage equipment".to_string()))
        }
    }

    pub fn require_read_leave(&self) -> Result<(), AppError> {
        if self.rights.leave_rights as u8 >= Rights::Read as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to read leave requests".to_string()))
        }
    }

    pub fn require_write_leave(&self) -> Result<(), AppError> {
        if self.rights.leave_rights as u8 >= Rights::Write as u8 {
            Ok(())
        } else {
            Err(AppError::Authorization("Insufficient rights to manage leave requests".to_string()))
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}
