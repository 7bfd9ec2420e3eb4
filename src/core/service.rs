use crate::core::retry::{with_retry, RetryPolicy};
use crate::core::validator::validate_creation_input;
use crate::domain::model::{EmployeeDeletionRequest, EmployeeRecord, FieldBag};
use crate::domain::ports::UpstreamClient;
use crate::utils::error::{FacadeError, Result};

pub const TOP_EARNERS_LIMIT: usize = 10;

/// 聚合服務：包裝上游呼叫、計算衍生視圖、只對外拋出分類表內的錯誤。
///
/// 不持有任何可變狀態，可在多個請求間直接共享。
pub struct AggregationService<C: UpstreamClient> {
    client: C,
    read_policy: RetryPolicy,
}

impl<C: UpstreamClient> AggregationService<C> {
    pub fn new(client: C, read_policy: RetryPolicy) -> Self {
        Self {
            client,
            read_policy,
        }
    }

    /// 取得全部員工；空集合視為「查無資料」而非合法結果
    pub async fn list_all(&self) -> Result<Vec<EmployeeRecord>> {
        tracing::debug!("Calling external service to list employees");

        let envelope = with_retry(
            &self.read_policy,
            || self.client.list_employees(),
            |e| {
                tracing::error!("Error fetching employees: {}", e);
                FacadeError::UpstreamRetryExhausted
            },
        )
        .await?;

        let employees = envelope.into_data().unwrap_or_default();
        if employees.is_empty() {
            return Err(FacadeError::NoDataFound);
        }

        tracing::info!("Successfully fetched {} employees", employees.len());
        Ok(employees)
    }

    pub async fn search_by_name_substring(&self, query: &str) -> Result<Vec<EmployeeRecord>> {
        let matches: Vec<EmployeeRecord> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|employee| employee.name.contains(query))
            .collect();

        if matches.is_empty() {
            return Err(FacadeError::NoMatchingName);
        }

        tracing::info!(
            "Found {} employees whose name contains '{}'",
            matches.len(),
            query
        );
        Ok(matches)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<EmployeeRecord> {
        if id.is_empty() {
            return Err(FacadeError::MissingIdentifier);
        }

        tracing::debug!("Calling external service to get employee {}", id);

        let envelope = with_retry(
            &self.read_policy,
            || self.client.get_employee(id),
            |e| {
                tracing::error!("Error fetching employee {}: {}", id, e);
                FacadeError::UpstreamRetryExhausted
            },
        )
        .await?;

        let employee = envelope.into_data().ok_or(FacadeError::NoDataFound)?;
        tracing::info!("Successfully found employee with id: {}", employee.id);
        Ok(employee)
    }

    pub async fn highest_salary(&self) -> Result<i32> {
        let highest = highest_salary_of(&self.list_all().await?);
        tracing::info!("Highest employee salary is: {}", highest);
        Ok(highest)
    }

    pub async fn top_earning_names(&self, limit: usize) -> Result<Vec<String>> {
        let names = top_earning_names_of(self.list_all().await?, limit);
        tracing::info!("Top {} highest earning employees: {:?}", limit, names);
        Ok(names)
    }

    /// 建立員工。不重試：建立不是冪等操作
    pub async fn create(&self, fields: &FieldBag) -> Result<EmployeeRecord> {
        let request = validate_creation_input(fields)?;

        tracing::debug!("Calling external service to create employee");

        let envelope = self.client.create_employee(&request).await.map_err(|e| {
            tracing::error!("Error creating employee: {}", e);
            FacadeError::UpstreamUnavailable
        })?;

        let created = envelope.into_data().ok_or_else(|| {
            tracing::error!("Upstream create response carried no employee");
            FacadeError::UpstreamUnavailable
        })?;

        tracing::info!("Successfully created employee with id: {}", created.id);
        Ok(created)
    }

    /// 依 id 刪除並回傳被刪除者姓名。上游的確認內容不會被檢查
    pub async fn delete_by_id(&self, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(FacadeError::MissingIdentifier);
        }

        let employee = self.get_by_id(id).await?;
        let request = EmployeeDeletionRequest {
            name: employee.name,
        };

        tracing::debug!("Calling external service to delete employee {}", id);

        let confirmation = self.client.delete_employee(&request).await.map_err(|e| {
            tracing::error!("Error deleting employee: {}", e);
            FacadeError::UpstreamUnavailable
        })?;

        tracing::debug!("Upstream delete confirmation: {}", confirmation);
        tracing::info!("Successfully deleted employee with id: {}", id);
        Ok(request.name)
    }
}

/// 空集合回傳 0
pub fn highest_salary_of(employees: &[EmployeeRecord]) -> i32 {
    employees
        .iter()
        .map(|employee| employee.salary)
        .max()
        .unwrap_or(0)
}

// sort_by 是穩定排序，同薪資保留上游原順序
pub fn top_earning_names_of(mut employees: Vec<EmployeeRecord>, limit: usize) -> Vec<String> {
    employees.sort_by(|a, b| b.salary.cmp(&a.salary));
    employees
        .into_iter()
        .take(limit)
        .map(|employee| employee.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EmployeeCreationRequest, Envelope, FieldValue};
    use crate::domain::ports::UpstreamResult;
    use crate::utils::error::{UpstreamError, ValidationFailure};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockState {
        // None 代表上游回傳 data: null
        employees: Option<Vec<EmployeeRecord>>,
        list_failures: u32,
        get_failures: u32,
        create_fails: bool,
        delete_fails: bool,
        delete_body: String,
        list_calls: u32,
        get_calls: u32,
        created: Vec<EmployeeCreationRequest>,
        deleted: Vec<EmployeeDeletionRequest>,
    }

    #[derive(Clone, Default)]
    struct MockUpstream {
        state: Arc<Mutex<MockState>>,
    }

    impl MockUpstream {
        fn with_employees(employees: Vec<EmployeeRecord>) -> Self {
            let mock = Self::default();
            mock.state.try_lock().unwrap().employees = Some(employees);
            mock
        }

        async fn configure(&self, f: impl FnOnce(&mut MockState)) {
            let mut state = self.state.lock().await;
            f(&mut state);
        }
    }

    fn unavailable() -> UpstreamError {
        UpstreamError::Status(StatusCode::TOO_MANY_REQUESTS)
    }

    #[async_trait]
    impl UpstreamClient for MockUpstream {
        async fn list_employees(&self) -> UpstreamResult<Envelope<Vec<EmployeeRecord>>> {
            let mut state = self.state.lock().await;
            state.list_calls += 1;
            if state.list_failures > 0 {
                state.list_failures -= 1;
                return Err(unavailable());
            }
            Ok(Envelope::new("ok", state.employees.clone()))
        }

        async fn get_employee(&self, id: &str) -> UpstreamResult<Envelope<EmployeeRecord>> {
            let mut state = self.state.lock().await;
            state.get_calls += 1;
            if state.get_failures > 0 {
                state.get_failures -= 1;
                return Err(unavailable());
            }
            let found = state
                .employees
                .iter()
                .flatten()
                .find(|employee| employee.id == id)
                .cloned();
            Ok(Envelope::new("ok", found))
        }

        async fn create_employee(
            &self,
            request: &EmployeeCreationRequest,
        ) -> UpstreamResult<Envelope<EmployeeRecord>> {
            let mut state = self.state.lock().await;
            state.created.push(request.clone());
            if state.create_fails {
                return Err(unavailable());
            }
            Ok(Envelope::new(
                "Successfully processed request.",
                Some(EmployeeRecord {
                    id: "new-id".to_string(),
                    name: request.name.clone(),
                    salary: request.salary,
                    age: request.age,
                    title: request.title.clone(),
                    email: "new@company.com".to_string(),
                }),
            ))
        }

        async fn delete_employee(&self, request: &EmployeeDeletionRequest) -> UpstreamResult<String> {
            let mut state = self.state.lock().await;
            state.deleted.push(request.clone());
            if state.delete_fails {
                return Err(unavailable());
            }
            Ok(state.delete_body.clone())
        }
    }

    fn employee(id: &str, name: &str, salary: i32) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            salary,
            age: 30,
            title: "Developer".to_string(),
            email: format!("{}@company.com", id),
        }
    }

    fn service(mock: &MockUpstream) -> AggregationService<MockUpstream> {
        AggregationService::new(
            mock.clone(),
            RetryPolicy::new("test", 3, Duration::ZERO),
        )
    }

    fn valid_fields() -> FieldBag {
        FieldBag::new()
            .with("name", FieldValue::Text("John Doe".to_string()))
            .with("salary", FieldValue::Integer(50000))
            .with("age", FieldValue::Integer(30))
            .with("title", FieldValue::Text("Developer".to_string()))
    }

    #[tokio::test]
    async fn test_list_all_returns_upstream_order() {
        let mock = MockUpstream::with_employees(vec![
            employee("1", "Alice", 8000),
            employee("2", "Bob", 5000),
        ]);

        let result = service(&mock).list_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Alice");
        assert_eq!(result[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_list_all_empty_is_no_data_found() {
        let mock = MockUpstream::with_employees(vec![]);
        let result = service(&mock).list_all().await;
        assert!(matches!(result, Err(FacadeError::NoDataFound)));

        let absent = MockUpstream::default();
        let result = service(&absent).list_all().await;
        assert!(matches!(result, Err(FacadeError::NoDataFound)));
    }

    #[tokio::test]
    async fn test_list_all_retries_then_succeeds() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 8000)]);
        mock.configure(|s| s.list_failures = 2).await;

        let result = service(&mock).list_all().await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(mock.state.lock().await.list_calls, 3);
    }

    #[tokio::test]
    async fn test_list_all_exhausted_retries() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 8000)]);
        mock.configure(|s| s.list_failures = 10).await;

        let result = service(&mock).list_all().await;

        assert!(matches!(result, Err(FacadeError::UpstreamRetryExhausted)));
        assert_eq!(mock.state.lock().await.list_calls, 3);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive_substring() {
        let mock = MockUpstream::with_employees(vec![
            employee("1", "Alice", 1),
            employee("2", "Malicea", 2),
            employee("3", "Bob", 3),
        ]);
        let service = service(&mock);

        let result = service.search_by_name_substring("Alice").await.unwrap();
        let names: Vec<&str> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alice"]);

        let result = service.search_by_name_substring("lice").await.unwrap();
        let ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let result = service.search_by_name_substring("alice").await.unwrap();
        assert_eq!(result[0].id, "2");
    }

    #[tokio::test]
    async fn test_search_without_match() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        let result = service(&mock).search_by_name_substring("Zed").await;
        assert!(matches!(result, Err(FacadeError::NoMatchingName)));
    }

    #[tokio::test]
    async fn test_search_propagates_list_failure() {
        let mock = MockUpstream::with_employees(vec![]);
        let result = service(&mock).search_by_name_substring("A").await;
        assert!(matches!(result, Err(FacadeError::NoDataFound)));
    }

    #[tokio::test]
    async fn test_get_by_id_empty_id_skips_upstream() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);

        let result = service(&mock).get_by_id("").await;

        assert!(matches!(result, Err(FacadeError::MissingIdentifier)));
        assert_eq!(mock.state.lock().await.get_calls, 0);
    }

    #[tokio::test]
    async fn test_get_by_id_found_and_absent() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        let service = service(&mock);

        assert_eq!(service.get_by_id("1").await.unwrap().name, "Alice");
        assert!(matches!(
            service.get_by_id("99").await,
            Err(FacadeError::NoDataFound)
        ));
    }

    #[tokio::test]
    async fn test_get_by_id_persistent_failure_is_retry_exhausted() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        mock.configure(|s| s.get_failures = u32::MAX).await;

        let result = service(&mock).get_by_id("1").await;

        assert!(matches!(result, Err(FacadeError::UpstreamRetryExhausted)));
        assert_eq!(mock.state.lock().await.get_calls, 3);
    }

    #[tokio::test]
    async fn test_highest_salary() {
        let mock = MockUpstream::with_employees(vec![
            employee("1", "Alice", 50000),
            employee("2", "Bob", 70000),
        ]);
        assert_eq!(service(&mock).highest_salary().await.unwrap(), 70000);
    }

    #[test]
    fn test_highest_salary_of_empty_is_zero() {
        assert_eq!(highest_salary_of(&[]), 0);
    }

    #[tokio::test]
    async fn test_top_earning_names_limit_and_order() {
        let employees: Vec<EmployeeRecord> = (1..=12)
            .map(|i| employee(&i.to_string(), &format!("E{}", i), i * 1000))
            .collect();
        let mock = MockUpstream::with_employees(employees);

        let names = service(&mock)
            .top_earning_names(TOP_EARNERS_LIMIT)
            .await
            .unwrap();

        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "E12");
        assert_eq!(names[9], "E3");
    }

    #[test]
    fn test_top_earning_names_ties_keep_upstream_order() {
        let employees = vec![
            employee("1", "First", 5000),
            employee("2", "Rich", 9000),
            employee("3", "Second", 5000),
            employee("4", "Third", 5000),
        ];

        let names = top_earning_names_of(employees, 3);
        assert_eq!(names, vec!["Rich", "First", "Second"]);
    }

    #[test]
    fn test_top_earning_names_ignore_input_permutation() {
        let forward = vec![
            employee("1", "A", 3000),
            employee("2", "B", 1000),
            employee("3", "C", 2000),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            top_earning_names_of(forward, 10),
            top_earning_names_of(reversed, 10)
        );
    }

    #[tokio::test]
    async fn test_create_forwards_validated_fields() {
        let mock = MockUpstream::default();

        let created = service(&mock).create(&valid_fields()).await.unwrap();

        assert_eq!(created.id, "new-id");
        assert_eq!(created.name, "John Doe");
        let state = mock.state.lock().await;
        assert_eq!(
            state.created,
            vec![EmployeeCreationRequest {
                name: "John Doe".to_string(),
                salary: 50000,
                age: 30,
                title: "Developer".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_create_validation_failure_skips_upstream() {
        let mock = MockUpstream::default();
        let fields = valid_fields().with("age", FieldValue::Integer(90));

        let result = service(&mock).create(&fields).await;

        assert!(matches!(
            result,
            Err(FacadeError::Validation(ValidationFailure::AgeAboveMaximum))
        ));
        assert!(mock.state.lock().await.created.is_empty());
    }

    #[tokio::test]
    async fn test_create_transport_failure_is_not_retried() {
        let mock = MockUpstream::default();
        mock.configure(|s| s.create_fails = true).await;

        let result = service(&mock).create(&valid_fields()).await;

        assert!(matches!(result, Err(FacadeError::UpstreamUnavailable)));
        assert_eq!(mock.state.lock().await.created.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_returns_looked_up_name() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        mock.configure(|s| s.delete_body = "false".to_string()).await;

        let name = service(&mock).delete_by_id("1").await.unwrap();

        assert_eq!(name, "Alice");
        assert_eq!(
            mock.state.lock().await.deleted,
            vec![EmployeeDeletionRequest {
                name: "Alice".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_identifier_and_missing_employee() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        let service = service(&mock);

        assert!(matches!(
            service.delete_by_id("").await,
            Err(FacadeError::MissingIdentifier)
        ));
        assert!(matches!(
            service.delete_by_id("42").await,
            Err(FacadeError::NoDataFound)
        ));
        assert!(mock.state.lock().await.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_delete_transport_failure_is_upstream_unavailable() {
        let mock = MockUpstream::with_employees(vec![employee("1", "Alice", 1)]);
        mock.configure(|s| s.delete_fails = true).await;

        let result = service(&mock).delete_by_id("1").await;

        assert!(matches!(result, Err(FacadeError::UpstreamUnavailable)));
        assert_eq!(mock.state.lock().await.deleted.len(), 1);
    }
}
