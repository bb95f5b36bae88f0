//! Narrata - 文档朗读 CLI
//!
//! 读取文本文件，调用 ElevenLabs 合成语音并播放，
//! 按词时间轴在终端打印当前朗读的词。

use std::sync::Arc;

use narrata::config::{load_config, print_config};
use narrata::domain::narration::HighlightSpan;
use narrata::infrastructure::adapters::tts::{ElevenLabsClient, ElevenLabsConfig};
use narrata::infrastructure::adapters::RodioPlayback;
use narrata::infrastructure::persistence::sled::SledVoiceStore;
use narrata::infrastructure::worker::{MonitorConfig, PlaybackMonitor};
use rodio::OutputStream;

use narrata::application::ports::{SpeechSynthesizerPort, VoiceStorePort};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},narrata={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Narrata - 文档朗读 TTS");
    print_config(&config);

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: narrata <text-file>"))?;
    let text = tokio::fs::read_to_string(&path).await?;

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.storage.store_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 音色库与默认音色
    let store = SledVoiceStore::open(&config.storage.store_path)
        .map_err(|e| anyhow::anyhow!("Failed to open voice store: {}", e))?;
    let voice_id = store
        .default_voice()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve default voice: {}", e))?;
    tracing::info!(voice_id = %voice_id, "Using voice");

    // ElevenLabs 客户端
    let tts_config = ElevenLabsConfig {
        api_key: config.tts.api_key.clone(),
        base_url: config.tts.base_url.clone(),
        timeout_secs: config.tts.timeout_secs,
    };
    let client = Arc::new(
        ElevenLabsClient::new(tts_config)
            .map_err(|e| anyhow::anyhow!("Failed to create TTS client: {}", e))?,
    );

    // 合成，Ctrl-C 取消
    tracing::info!(chars = text.chars().count(), "Synthesizing...");
    let result = {
        let synth = tokio::spawn({
            let client = client.clone();
            let text = text.clone();
            let voice = voice_id.as_str().to_string();
            async move { client.synthesize(&text, &voice).await }
        });

        tokio::select! {
            res = synth => res?.map_err(|e| anyhow::anyhow!("Synthesis failed: {}", e))?,
            _ = tokio::signal::ctrl_c() => {
                client.cancel();
                tracing::info!("Synthesis cancelled");
                return Ok(());
            }
        }
    };

    tracing::info!(
        audio_bytes = result.audio.len(),
        word_count = result.timings.len(),
        "Synthesis complete"
    );

    // 播放（OutputStream 须由 main 持有保活）
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| anyhow::anyhow!("Failed to open audio output: {}", e))?;
    let playback = Arc::new(
        RodioPlayback::new(&stream_handle)
            .map_err(|e| anyhow::anyhow!("Failed to create playback sink: {}", e))?,
    );
    playback
        .play(result.audio)
        .map_err(|e| anyhow::anyhow!("Failed to play audio: {}", e))?;

    // 监视播放进度，打印当前朗读的词
    let monitor_config = MonitorConfig {
        poll_interval_ms: config.playback.poll_interval_ms,
    };
    let (monitor, mut updates) =
        PlaybackMonitor::spawn(playback.clone(), result.timings, monitor_config);

    let mut last_span: Option<HighlightSpan> = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = updates.borrow().clone();
                if update.highlight != last_span {
                    if let Some(span) = update.highlight {
                        let word = slice_chars(&text, span.start_index, span.end_index);
                        let progress = match update.duration {
                            Some(d) if d > 0.0 => {
                                format!(" [{:.1}/{:.1}s]", update.current_time, d)
                            }
                            _ => String::new(),
                        };
                        println!("▶ {}{}", word, progress);
                    }
                    last_span = update.highlight;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Playback interrupted");
                playback.stop();
                monitor.shutdown();
                break;
            }
        }
    }

    tracing::info!("Playback finished");
    Ok(())
}

/// 按字符偏移截取文本（时间轴索引以字符计）
fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
