use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::ApiError;
use crate::api::helpers::{optional_text, parse_body, reject_unknown_fields, Params};
use crate::api::types::AppState;
use crate::store::{current_timestamp, FeeRecord, PaymentMode};
use crate::summary::{parse_limit, recent_first};

pub const FEE_CREATED: &str = "Fee submitted successfully.";
pub const FEE_FIELDS_REQUIRED: &str = "All fee fields are required.";
const AMOUNT_INVALID: &str = "amount must be a positive number.";
/// Upper bound for a single payment. Keeps every sum over the fee log finite.
pub const MAX_FEE_AMOUNT: f64 = 10_000_000.0;

/// A fee submission that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSubmission {
    pub student_name: String,
    pub class_name: String,
    pub roll_no: String,
    pub amount: f64,
    pub payment_mode: PaymentMode,
}

impl FeeSubmission {
    pub const FIELDS: [&'static str; 5] =
        ["studentName", "className", "rollNo", "amount", "paymentMode"];

    pub fn from_params(params: &Params) -> Result<Self, ApiError> {
        reject_unknown_fields(params, &Self::FIELDS)?;

        let student_name = optional_text(params, "studentName")?;
        let class_name = optional_text(params, "className")?;
        let roll_no = optional_text(params, "rollNo")?;
        let amount = optional_amount(params.get("amount"))?;
        let payment_mode = optional_text(params, "paymentMode")?;

        let (
            Some(student_name),
            Some(class_name),
            Some(roll_no),
            Some(amount),
            Some(payment_mode),
        ) = (student_name, class_name, roll_no, amount, payment_mode)
        else {
            return Err(ApiError::validation(FEE_FIELDS_REQUIRED));
        };

        if !amount.is_finite() || amount <= 0.0 || amount > MAX_FEE_AMOUNT {
            return Err(ApiError::validation(AMOUNT_INVALID));
        }
        let Some(payment_mode) = PaymentMode::parse(&payment_mode) else {
            let labels: Vec<&str> = PaymentMode::ALL.iter().map(|m| m.as_str()).collect();
            return Err(ApiError::validation(format!(
                "paymentMode must be one of: {}.",
                labels.join(", ")
            )));
        };

        Ok(Self {
            student_name,
            class_name,
            roll_no,
            amount,
            payment_mode,
        })
    }
}

/// Numbers pass through; numeric strings are coerced. Absent, null, `""` and
/// the number `0` all count as missing.
fn optional_amount(v: Option<&Value>) -> Result<Option<f64>, ApiError> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(a) if a == 0.0 => Ok(None),
            Some(a) => Ok(Some(a)),
            None => Err(ApiError::validation(AMOUNT_INVALID)),
        },
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::validation(AMOUNT_INVALID)),
        Some(_) => Err(ApiError::validation(AMOUNT_INVALID)),
    }
}

async fn handle_fees_list(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit = parse_limit(query.get("limit").map(String::as_str));
    let store = state.store.read().await;
    Json(json!({
        "fees": recent_first(store.fees(), limit),
        "total": store.fees().len(),
    }))
}

async fn handle_fees_submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = FeeSubmission::from_params(&parse_body(&body)?)?;

    let mut store = state.store.write().await;
    let fee = FeeRecord {
        id: store.next_fee_id(),
        student_name: input.student_name,
        class_name: input.class_name,
        roll_no: input.roll_no,
        amount: input.amount,
        payment_mode: input.payment_mode,
        submitted_at: current_timestamp(),
    };
    store.append_fee(fee.clone());
    info!(
        fee_id = %fee.id,
        amount = fee.amount,
        payment_mode = fee.payment_mode.as_str(),
        "fee recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": FEE_CREATED, "fee": fee })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/fees", get(handle_fees_list).post(handle_fees_submit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(v: Value) -> Result<FeeSubmission, ApiError> {
        let Value::Object(params) = v else {
            panic!("object expected");
        };
        FeeSubmission::from_params(&params)
    }

    fn valid() -> Value {
        json!({
            "studentName": "A",
            "className": "8A",
            "rollNo": "1",
            "amount": 100,
            "paymentMode": "Cash"
        })
    }

    #[test]
    fn accepts_complete_submission() {
        let s = submit(valid()).expect("valid");
        assert_eq!(s.amount, 100.0);
        assert_eq!(s.payment_mode, PaymentMode::Cash);
        assert_eq!(s.roll_no, "1");
    }

    #[test]
    fn numeric_string_amount_is_coerced() {
        let mut v = valid();
        v["amount"] = json!("2500.50");
        assert_eq!(submit(v).expect("valid").amount, 2500.5);
    }

    #[test]
    fn each_missing_field_is_rejected() {
        for field in FeeSubmission::FIELDS {
            let mut v = valid();
            v.as_object_mut().expect("object").remove(field);
            assert_eq!(
                submit(v),
                Err(ApiError::validation(FEE_FIELDS_REQUIRED)),
                "{field}"
            );
        }
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for (field, value) in [
            ("studentName", json!("")),
            ("rollNo", json!(null)),
            ("amount", json!(0)),
            ("amount", json!("")),
            ("paymentMode", json!("")),
        ] {
            let mut v = valid();
            v[field] = value;
            assert_eq!(
                submit(v),
                Err(ApiError::validation(FEE_FIELDS_REQUIRED)),
                "{field}"
            );
        }
    }

    #[test]
    fn bad_amounts_are_rejected() {
        for value in [json!(-5), json!("abc"), json!("0"), json!("inf"), json!(true)] {
            let mut v = valid();
            v["amount"] = value.clone();
            assert_eq!(
                submit(v),
                Err(ApiError::validation(AMOUNT_INVALID)),
                "{value}"
            );
        }
    }

    #[test]
    fn amount_above_cap_is_rejected() {
        let mut v = valid();
        v["amount"] = json!(MAX_FEE_AMOUNT);
        assert_eq!(submit(v).expect("at cap").amount, MAX_FEE_AMOUNT);

        for value in [json!(1e308), json!("1e308"), json!(MAX_FEE_AMOUNT + 0.01)] {
            let mut v = valid();
            v["amount"] = value.clone();
            assert_eq!(
                submit(v),
                Err(ApiError::validation(AMOUNT_INVALID)),
                "{value}"
            );
        }
    }

    #[test]
    fn unknown_mode_and_fields_are_rejected() {
        let mut v = valid();
        v["paymentMode"] = json!("Cheque");
        assert!(matches!(
            submit(v),
            Err(ApiError::Validation(m)) if m.contains("UPI, Cash, Card, NetBanking")
        ));

        let mut v = valid();
        v["discount"] = json!(10);
        assert_eq!(
            submit(v),
            Err(ApiError::validation("Unknown field(s): discount."))
        );
    }

    #[test]
    fn mistyped_text_field_is_rejected() {
        let mut v = valid();
        v["rollNo"] = json!(1);
        assert_eq!(
            submit(v),
            Err(ApiError::validation("rollNo must be a string."))
        );
    }
}
