use serde::Serialize;
use serde_json::Value;

/// The loan-application request body. Every probe starts from the same
/// baseline and overrides the fields under test; only the email varies, so
/// duplicate-application rejection cannot mask a verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub employment_status: String,
    pub employer: String,
    pub monthly_income: i64,
    pub loan_type: String,
    pub requested_amount: i64,
    pub loan_purpose: String,
    pub disbursement_method: String,
}

impl LoanApplication {
    pub fn baseline(email_tag: &str) -> Self {
        Self {
            full_name: "Test User".to_string(),
            email: format!("test.{}@example.com", email_tag),
            phone: "5551234567".to_string(),
            password: "SecurePass123!@#".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            ssn: "123-45-6789".to_string(),
            street: "123 Main Street".to_string(),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            zip_code: "02101".to_string(),
            employment_status: "employed".to_string(),
            employer: "Test Company".to_string(),
            monthly_income: 5000,
            loan_type: "installment".to_string(),
            requested_amount: 25000,
            loan_purpose: "Test loan purpose".to_string(),
            disbursement_method: "bank_transfer".to_string(),
        }
    }

    /// Override a text field by its wire name. Returns false for unknown
    /// or non-text fields.
    pub fn set_text_field(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "fullName" => &mut self.full_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "password" => &mut self.password,
            "dateOfBirth" => &mut self.date_of_birth,
            "ssn" => &mut self.ssn,
            "street" => &mut self.street,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "zipCode" => &mut self.zip_code,
            "employmentStatus" => &mut self.employment_status,
            "employer" => &mut self.employer,
            "loanType" => &mut self.loan_type,
            "loanPurpose" => &mut self.loan_purpose,
            "disbursementMethod" => &mut self.disbursement_method,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    pub fn set_amount_field(&mut self, field: &str, value: i64) -> bool {
        match field {
            "monthlyIncome" => self.monthly_income = value,
            "requestedAmount" => self.requested_amount = value,
            _ => return false,
        }
        true
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("loan application serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_deterministic() {
        let a = LoanApplication::baseline("tag");
        let b = LoanApplication::baseline("tag");
        assert_eq!(a.to_value(), b.to_value());
        assert_eq!(a.email, "test.tag@example.com");
    }

    #[test]
    fn test_field_overrides() {
        let mut app = LoanApplication::baseline("x");
        assert!(app.set_text_field("fullName", "Jane"));
        assert!(app.set_amount_field("monthlyIncome", 0));
        assert!(!app.set_text_field("notAField", "y"));

        let value = app.to_value();
        assert_eq!(value["fullName"], "Jane");
        assert_eq!(value["monthlyIncome"], 0);
        assert_eq!(value["loanType"], "installment");
    }
}
