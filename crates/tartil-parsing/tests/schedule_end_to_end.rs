//! End-to-end tests for the schedule parser on realistic daily posts.

use tartil_parsing::{
    FinalRecord, ParsingConfigBuilder, ScheduleExtractor, UNKNOWN_CONTENT, UNKNOWN_PERSON,
    UNKNOWN_TIME, compose, extract_time, parse_header, parse_schedule,
};

const DAILY_POST: &str = "\
برنامج إذاعة القرآن الكريم من القاهرة
يوم الخميس : 9 رجب 1446هـ الموافق 09/01/2025م.

🔹 الساعة 06:00 (ص) تلاوة للشيخ محمد صديق المنشاوي
ما تيسر من سورة البقرة و القمر و التحريم
🔹 الساعة 07:30 تلاوة للقارئ / محمود خليل الحصري / من سورة يس 20 ق
🔹 الساعة 09:00 للشيخ مصطفى إسماعيل من الآية 45 من سورة ص حتى الآية 61 من سورة الزمر
🔹 الساعة 08:15 (م) تلاوة للشيخ محمد رفعت
ما تيسر من قصار السور و النمل
";

fn assert_no_empty_fields(records: &[FinalRecord]) {
    for r in records {
        assert!(!r.time.trim().is_empty(), "empty time in {:?}", r);
        assert!(!r.person.trim().is_empty(), "empty person in {:?}", r);
        assert!(!r.content.trim().is_empty(), "empty content in {:?}", r);
    }
}

#[test]
fn daily_post_yields_one_record_per_item() {
    let records = parse_schedule(DAILY_POST);
    assert_eq!(records.len(), 4, "records: {:#?}", records);
    assert_no_empty_fields(&records);

    assert_eq!(records[0].time, "06:00");
    assert_eq!(records[0].person, "محمد صديق المنشاوي");
    assert_eq!(records[0].content, "سورة البقرة و القمر و التحريم");

    assert_eq!(records[1].time, "07:30");
    assert_eq!(records[1].person, "محمود خليل الحصري");
    assert_eq!(records[1].content, "سورة يس");

    assert_eq!(records[2].time, "09:00");
    assert_eq!(records[2].person, "مصطفى إسماعيل");
    assert_eq!(
        records[2].content,
        "(من الآية 45 سورة ص حتى الآية 61 سورة الزمر)"
    );

    assert_eq!(records[3].time, "20:15");
    assert_eq!(records[3].person, "محمد رفعت");
    assert_eq!(records[3].content, "قصار السور و النمل");
}

#[test]
fn daily_post_header_date() {
    let header = parse_header(DAILY_POST).unwrap();
    assert_eq!(header.weekday, "الخميس");
    assert_eq!(
        header.gregorian_date().map(|d| d.to_string()),
        Some("2025-01-09".to_string())
    );
}

#[test]
fn junk_input_never_panics() {
    let inputs = [
        "",
        "\n\n\n",
        "(((",
        ")))]]]}}}",
        "📻📻📻",
        "الساعة",
        "الساعة :",
        "للشيخ /",
        "من سورة",
        "ما تيسر من",
        "99:99 99.99 ١٢:٣٤٥",
        "من الآية 1 سورة",
        "lorem ipsum dolor sit amet",
        "\u{0000}\u{FEFF}\u{200F}",
    ];
    for input in inputs {
        let records = parse_schedule(input);
        assert_no_empty_fields(&records);
    }
}

#[test]
fn time_line_and_continuation_merge() {
    let records = parse_schedule("الساعة 10:20 تلاوة للشيخ أحمد نعينع\nمن سورة مريم");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].time, "10:20");
    assert_eq!(records[0].person, "أحمد نعينع");
    assert_eq!(records[0].content, "سورة مريم");
}

#[test]
fn records_follow_input_order() {
    let text: String = (10..20)
        .map(|h| format!("الساعة {}:30 تلاوة للشيخ قارئ{} من سورة يس\n", h, h))
        .collect();
    let records = parse_schedule(&text);
    assert_eq!(records.len(), 10);
    for (i, r) in records.iter().enumerate() {
        assert_eq!(r.time, format!("{}:30", 10 + i));
        assert_eq!(r.person, format!("قارئ{}", 10 + i));
    }
}

#[test]
fn unknown_fields_use_placeholders() {
    let extractor = ScheduleExtractor::with_config(
        ParsingConfigBuilder::new().without_gazetteer().build().unwrap(),
    );
    let records = extractor.parse_schedule("للشيخ فلان\nالساعة 99:99 من سورة الملك");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].time, UNKNOWN_TIME);
    assert_eq!(records[0].content, UNKNOWN_CONTENT);
    assert_eq!(records[1].time, UNKNOWN_TIME);
    assert_eq!(records[1].person, UNKNOWN_PERSON);
    assert_eq!(records[1].content, "سورة الملك");
}

#[test]
fn documented_time_repairs() {
    assert_eq!(extract_time("06:00"), "06:00");
    assert_eq!(extract_time("44:09"), "09:44");
    assert_eq!(extract_time("12:03"), "03:12");
}

#[test]
fn documented_compositions() {
    let t = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(
        compose(&t(&["سورة البقرة", "القمر", "التحريم"]), None),
        "سورة البقرة و القمر و التحريم"
    );
    assert_eq!(
        compose(&t(&["قصار السور", "النمل"]), None),
        "قصار السور و النمل"
    );
}

#[test]
fn records_serialize_with_plain_field_names() {
    let records = parse_schedule("الساعة 06:00 للشيخ فلان من سورة يس");
    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["time"], "06:00");
    assert_eq!(json[0]["person"], "فلان");
    assert_eq!(json[0]["content"], "سورة يس");
}

#[test]
fn duration_clause_stays_out_of_content() {
    let records = parse_schedule("الساعة 06:30 للشيخ فلان من سورة يس مدة التلاوة ربع ساعة");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].time, "06:30");
    assert_eq!(records[0].person, "فلان");
    assert_eq!(records[0].content, "سورة يس");
}
