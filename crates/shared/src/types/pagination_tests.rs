use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest {
        page: 1,
        per_page: 20,
    };
    assert_eq!(request.offset(), 0);

    let request = PageRequest {
        page: 3,
        per_page: 20,
    };
    assert_eq!(request.offset(), 40);
    assert_eq!(request.page_index(), 2);
}

#[test]
fn test_page_request_clamps_values() {
    let request = PageRequest::new(Some(0), Some(500));
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 100);

    let request = PageRequest::new(None, Some(0));
    assert_eq!(request.per_page, 1);
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), 1, 10, 3);

    assert_eq!(response.data, data);
    assert_eq!(response.meta.page, 1);
    assert_eq!(response.meta.per_page, 10);
    assert_eq!(response.meta.total, 3);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_response_pagination() {
    // 25 items, 10 per page -> 3 pages
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 25);
    assert_eq!(response.meta.total_pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_page_response_map_keeps_meta() {
    let response = PageResponse::new(vec![1, 2], 2, 2, 4).map(|n| n * 10);
    assert_eq!(response.data, vec![10, 20]);
    assert_eq!(response.meta.page, 2);
    assert_eq!(response.meta.total_pages, 2);
}
