use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 上游系統擁有的員工記錄，本服務只讀取與轉送
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: i32,
    #[serde(rename = "employee_age")]
    pub age: i32,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// 通過驗證的建立請求，送往上游一次後即丟棄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCreationRequest {
    pub name: String,
    pub salary: i32,
    pub age: i32,
    pub title: String,
}

/// 上游刪除介面以姓名為鍵，而非 id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDeletionRequest {
    pub name: String,
}

/// 上游所有回應的外層包裝。`data` 為 None 表示「不存在」，與空集合不同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(status: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.into(),
            data,
        }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
}

/// 未經型別化的建立輸入。無法表示的 JSON 值（浮點數、布林、null、巢狀結構、
/// 超出 i32 範圍的整數）在轉換時略過，驗證時等同缺少該欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBag {
    fields: HashMap<String, FieldValue>,
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: FieldValue) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// 只接受 JSON 物件；其他形狀回傳 None
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut fields = HashMap::new();

        for (key, value) in object {
            let field = match value {
                serde_json::Value::String(text) => Some(FieldValue::Text(text.clone())),
                serde_json::Value::Number(number) => number
                    .as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .map(FieldValue::Integer),
                _ => None,
            };

            if let Some(field) = field {
                fields.insert(key.clone(), field);
            }
        }

        Some(Self { fields })
    }
}
