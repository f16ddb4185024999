use newsping::formatting::FormattedMessage;
use newsping::kakao::KakaoSender;

fn message() -> FormattedMessage {
    FormattedMessage {
        title: "📢 2026년 08월 30일 오늘의 주요 뉴스".to_string(),
        content: "1. 테스트 기사\n👉 요약: 요약문\n🔗 https://example.com\n---".to_string(),
        template_id: "news_summary".to_string(),
    }
}

#[tokio::test]
async fn test_send_message_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/v2/api/talk/message/default/send")
        .match_header("authorization", "Bearer test-token")
        .match_header(
            "content-type",
            mockito::Matcher::Regex("application/x-www-form-urlencoded".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"successful_receiver_uuids":["uuid-1"]}"#)
        .create_async()
        .await;

    let sender = KakaoSender::new("test-token").with_endpoints(
        format!("{}/v2/api/talk/message/default/send", server.url()),
        format!("{}/v2/api/talk/memo/default/send", server.url()),
    );

    let delivered = sender
        .send_message(&message(), &["uuid-1".to_string()])
        .await
        .expect("send");

    assert!(delivered);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_rejected_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/v2/api/talk/message/default/send")
        .with_status(401)
        .with_body(r#"{"msg":"this access token does not exist","code":-401}"#)
        .create_async()
        .await;

    let sender = KakaoSender::new("expired-token").with_endpoints(
        format!("{}/v2/api/talk/message/default/send", server.url()),
        format!("{}/v2/api/talk/memo/default/send", server.url()),
    );

    let delivered = sender
        .send_message(&message(), &["uuid-1".to_string()])
        .await
        .expect("send should not error on rejection");

    assert!(!delivered);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_to_me_posts_text_template_object() {
    let mut server = mockito::Server::new_async().await;

    // The memo endpoint takes a form-encoded JSON template_object of type text
    let mock = server
        .mock("POST", "/v2/api/talk/memo/default/send")
        .match_header("authorization", "Bearer test-token")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("template_object=".to_string()),
            mockito::Matcher::Regex("%22object_type%22".to_string()),
            mockito::Matcher::Regex("%22text%22".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"result_code":0}"#)
        .create_async()
        .await;

    let sender = KakaoSender::new("test-token").with_endpoints(
        format!("{}/v2/api/talk/message/default/send", server.url()),
        format!("{}/v2/api/talk/memo/default/send", server.url()),
    );

    let delivered = sender.send_to_me(&message()).await.expect("send to me");

    assert!(delivered);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_failure_is_an_error() {
    // Point at a server that immediately drops: unreachable port
    let sender = KakaoSender::new("test-token")
        .with_endpoints(
            "http://127.0.0.1:1/v2/api/talk/message/default/send",
            "http://127.0.0.1:1/v2/api/talk/memo/default/send",
        )
        .with_timeout(1);

    let result = sender.send_message(&message(), &["uuid-1".to_string()]).await;
    assert!(result.is_err());
}
