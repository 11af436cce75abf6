//! Property-based tests for history paging
//!
//! Uses proptest to check that any `limit`/`offset` input is normalized and
//! that every page is the matching window of the newest-first history.

#![cfg(feature = "ssr")]

use proptest::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use roomlog::backend::exchange::{MessageExchange, Pagination};
use roomlog::backend::realtime::HubPublisher;
use roomlog::backend::store::{AccountStore, MemoryStore};
use roomlog::shared::MessageType;

proptest! {
    #[test]
    fn test_query_values_always_normalize(
        limit in proptest::option::of(".{0,8}"),
        offset in proptest::option::of(".{0,8}"),
    ) {
        let page = Pagination::from_query(limit.as_deref(), offset.as_deref());
        prop_assert!(page.limit >= 1);
        prop_assert!(page.offset >= 0);
    }

    #[test]
    fn test_numeric_values_are_kept_when_in_range(limit in 1i64..10_000, offset in 0i64..10_000) {
        let page = Pagination::from_query(Some(&limit.to_string()), Some(&offset.to_string()));
        prop_assert_eq!(page, Pagination { limit, offset });
    }

    #[test]
    fn test_page_is_window_of_newest_first_history(
        total in 0usize..20,
        limit in 1i64..25,
        offset in 0i64..25,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let author = store.create_account(Uuid::new_v4(), "joe", "hash").await.unwrap();
            let (publisher, _rx) = HubPublisher::channel();
            let exchange = MessageExchange::new(store, publisher);

            for i in 0..total {
                exchange
                    .create_message(MessageType::Text, format!("m{}", i), author.id)
                    .await
                    .unwrap();
            }

            let page = exchange
                .list_messages(Pagination { limit, offset })
                .await
                .unwrap();

            let expected: Vec<String> = (0..total)
                .rev()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|i| format!("m{}", i))
                .collect();
            let actual: Vec<String> = page.messages.iter().map(|m| m.content.clone()).collect();

            assert_eq!(page.count, total as i64);
            assert_eq!(page.limit, limit);
            assert_eq!(page.offset, offset);
            assert_eq!(actual, expected);
        });
    }
}
