use std::time::Duration;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;
use crate::core::library::{DataError, DataResult};
use crate::core::store::{Document, DocumentFilter, DocumentStore, ID_FIELD, USER_ID_FIELD};
use crate::core::stream;
use crate::core::stream::Feed;
use crate::utils::ddb::{add_filter_expr, document_from_item, owner_index_name, parse_item, value_to_item};

// DynamoDB-backed document store. Tables are named after collections, keyed
// by the `id` attribute, with an owner GSI for equality queries on
// `user_id`. DynamoDB has no push channel, so live queries are bridged by a
// poll loop that feeds a conflated channel and emits only on change.
#[derive(Debug, Clone)]
pub struct DdbDocumentStore {
    client: Client,
    poll_interval: Duration,
}

impl DdbDocumentStore {
    pub fn new(client: Client, poll_interval_millis: u64) -> Self {
        Self {
            client,
            poll_interval: Duration::from_millis(poll_interval_millis),
        }
    }

    async fn fetch_document(client: &Client, collection: &str, id: &str) -> DataResult<Option<Document>> {
        client
            .get_item()
            .table_name(collection)
            .key(ID_FIELD, AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(DataError::from)
            .map(|out| out.item.as_ref().map(document_from_item))
    }

    async fn fetch_matching(client: &Client, collection: &str,
                            filter: &DocumentFilter) -> DataResult<Vec<Document>> {
        let items = if let Some(owner) = filter.get(USER_ID_FIELD) {
            let mut request = client
                .query()
                .table_name(collection)
                .index_name(owner_index_name(collection))
                .limit(500)
                .consistent_read(false)
                .key_condition_expression(format!("{} = :{}", USER_ID_FIELD, USER_ID_FIELD))
                .expression_attribute_values(format!(":{}", USER_ID_FIELD).as_str(),
                                             AttributeValue::S(owner.to_string()));
            let mut filter_expr = String::new();
            for (field, value) in filter {
                if field != USER_ID_FIELD {
                    let ks = add_filter_expr(field.as_str(), &mut filter_expr);
                    request = request.expression_attribute_values(format!(":{}", ks).as_str(),
                                                                  AttributeValue::S(value.to_string()));
                }
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
            request.send().await.map_err(DataError::from)?.items.unwrap_or_default()
        } else {
            let mut request = client
                .scan()
                .table_name(collection)
                .limit(500)
                .consistent_read(false);
            let mut filter_expr = String::new();
            for (field, value) in filter {
                let ks = add_filter_expr(field.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(),
                                                              AttributeValue::S(value.to_string()));
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
            request.send().await.map_err(DataError::from)?.items.unwrap_or_default()
        };
        let mut documents: Vec<Document> = items.iter().map(document_from_item).collect();
        // poll emissions are compared snapshot to snapshot
        documents.sort_by(|a, b| {
            let left = a.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default().to_string();
            let right = b.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default().to_string();
            left.cmp(&right)
        });
        Ok(documents)
    }
}

#[async_trait]
impl DocumentStore for DdbDocumentStore {
    async fn create_or_merge(&self, collection: &str, id: Option<&str>,
                             fields: Document) -> DataResult<String> {
        match id {
            None => {
                // no native key allocation in DynamoDB
                let id = Uuid::new_v4().to_string();
                let mut fields = fields;
                fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                let item = parse_item(Value::Object(fields))
                    .map_err(|err| DataError::serialization(err.as_str()))?;
                self.client
                    .put_item()
                    .table_name(collection)
                    .condition_expression("attribute_not_exists(#id)")
                    .expression_attribute_names("#id", ID_FIELD)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| id)
                    .map_err(DataError::from)
            }
            Some(id) => {
                let mut fields = fields;
                fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                let merge = merge_expression(fields);
                let mut request = self.client
                    .update_item()
                    .table_name(collection)
                    .key(ID_FIELD, AttributeValue::S(id.to_string()))
                    .update_expression(merge.expr);
                for (placeholder, field) in merge.names {
                    request = request.expression_attribute_names(placeholder, field);
                }
                for (slot, value) in merge.values {
                    request = request.expression_attribute_values(slot, value);
                }
                request
                    .send()
                    .await
                    .map(|_| id.to_string())
                    .map_err(DataError::from)
            }
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> DataResult<()> {
        self.client
            .delete_item()
            .table_name(collection)
            .key(ID_FIELD, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map(|_| ())
            .map_err(DataError::from)
    }

    fn subscribe_collection(&self, collection: &str, filter: &DocumentFilter) -> Feed<Vec<Document>> {
        let (tx, rx) = stream::channel();
        let client = self.client.clone();
        let collection = collection.to_string();
        let filter = filter.clone();
        let every = self.poll_interval;
        let listener = tokio::spawn(async move {
            let mut last: Option<Vec<Document>> = None;
            loop {
                match DdbDocumentStore::fetch_matching(&client, collection.as_str(), &filter).await {
                    Ok(documents) => {
                        if last.as_ref() != Some(&documents) {
                            last = Some(documents.clone());
                            if !tx.send(Ok(documents)) {
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        warn!("collection listener for {} failed: {}", collection, err);
                        let _ = tx.send(Err(err));
                        break;
                    }
                }
                tokio::time::sleep(every).await;
                if tx.is_closed() {
                    break;
                }
            }
        });
        Feed::new(rx, Some(listener))
    }

    fn subscribe_document(&self, collection: &str, id: &str) -> Feed<Option<Document>> {
        let (tx, rx) = stream::channel();
        let client = self.client.clone();
        let collection = collection.to_string();
        let id = id.to_string();
        let every = self.poll_interval;
        let listener = tokio::spawn(async move {
            let mut last: Option<Option<Document>> = None;
            loop {
                match DdbDocumentStore::fetch_document(&client, collection.as_str(), id.as_str()).await {
                    Ok(document) => {
                        if last.as_ref() != Some(&document) {
                            last = Some(document.clone());
                            if !tx.send(Ok(document)) {
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        warn!("document listener for {}/{} failed: {}", collection, id, err);
                        let _ = tx.send(Err(err));
                        break;
                    }
                }
                tokio::time::sleep(every).await;
                if tx.is_closed() {
                    break;
                }
            }
        });
        Feed::new(rx, Some(listener))
    }
}

pub(crate) struct MergeExpression {
    pub expr: String,
    pub names: Vec<(String, String)>,
    pub values: Vec<(String, AttributeValue)>,
}

// Builds "SET #f0 = :v0, ..." with placeholders for every attribute name,
// sidestepping the reserved-word list.
pub(crate) fn merge_expression(fields: Document) -> MergeExpression {
    let mut expr = String::new();
    let mut names = Vec::new();
    let mut values = Vec::new();
    for (i, (field, value)) in fields.into_iter().enumerate() {
        let placeholder = format!("#f{}", i);
        let slot = format!(":v{}", i);
        if expr.is_empty() {
            expr.push_str("SET ");
        } else {
            expr.push_str(", ");
        }
        expr.push_str(format!("{} = {}", placeholder, slot).as_str());
        names.push((placeholder, field));
        values.push((slot, value_to_item(value)));
    }
    MergeExpression { expr, names, values }
}
